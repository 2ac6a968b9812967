//! Day-level rollup of several reviewed plans

use serde::Serialize;

use super::execution::ExecutionSummary;

/// An execution summary labelled with its plan's name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedExecutionSummary {
    pub plan_name: String,
    pub summary: ExecutionSummary,
}

/// Totals across every plan reviewed in one day
#[derive(Debug, Clone, Serialize)]
pub struct DailyReviewAggregate {
    pub total_plans: usize,
    pub total_planned: usize,
    pub total_found: usize,
    pub total_completed: usize,
    pub total_not_completed: usize,
    pub total_missing: usize,
    /// total_completed / total_found, 0 when nothing was found
    pub overall_completion_rate: f64,
    /// The per-plan summaries that were aggregated
    pub plans: Vec<NamedExecutionSummary>,
}

/// Sum several plan summaries into one daily picture. Pure; the per-plan
/// ledger rows were already written when each plan was reviewed.
pub fn aggregate_summaries(plans: Vec<NamedExecutionSummary>) -> DailyReviewAggregate {
    let mut total_planned = 0;
    let mut total_found = 0;
    let mut total_completed = 0;
    let mut total_not_completed = 0;
    let mut total_missing = 0;

    for named in &plans {
        let s = &named.summary;
        total_planned += s.total_planned;
        total_found += s.found_tasks;
        total_completed += s.completed;
        total_not_completed += s.not_completed;
        total_missing += s.missing;
    }

    let overall_completion_rate = if total_found > 0 {
        total_completed as f64 / total_found as f64
    } else {
        0.0
    };

    DailyReviewAggregate {
        total_plans: plans.len(),
        total_planned,
        total_found,
        total_completed,
        total_not_completed,
        total_missing,
        overall_completion_rate,
        plans,
    }
}
