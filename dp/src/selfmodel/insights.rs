//! Aggregate profile of planning behavior

use serde::Serialize;
use std::collections::HashMap;

use crate::history::TaskUsage;

/// Planned/completed event counts for one lowercased tag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagStats {
    pub tag: String,
    pub times_planned: u32,
    pub times_completed: u32,
}

impl TagStats {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            times_planned: 0,
            times_completed: 0,
        }
    }

    pub fn completion_rate(&self) -> f64 {
        if self.times_planned == 0 {
            return 0.0;
        }
        f64::from(self.times_completed) / f64::from(self.times_planned)
    }
}

/// Overall portrait of how past plans were executed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerInsights {
    /// Distinct tasks that ever appeared in the ledger
    pub total_tasks: usize,
    pub total_planned_events: u32,
    pub total_completed_events: u32,
    pub overall_completion_rate: f64,
    /// Per-tag stats, best completion rate first
    pub tag_stats: Vec<TagStats>,
}

impl PlannerInsights {
    pub fn empty() -> Self {
        Self {
            total_tasks: 0,
            total_planned_events: 0,
            total_completed_events: 0,
            overall_completion_rate: 0.0,
            tag_stats: Vec::new(),
        }
    }

    pub fn has_history(&self) -> bool {
        self.total_planned_events > 0
    }

    /// Look up one tag's stats, case-insensitively
    pub fn tag(&self, name: &str) -> Option<&TagStats> {
        let name = name.to_lowercase();
        self.tag_stats.iter().find(|ts| ts.tag == name)
    }
}

/// Build the planner portrait from per-task usage rows
///
/// Every tag on a task inherits that task's full planned/completed counts,
/// so tags shared across tasks accumulate across them.
pub fn compute_insights(usage: &[TaskUsage]) -> PlannerInsights {
    let total_tasks = usage.len();
    let mut total_planned_events: u32 = 0;
    let mut total_completed_events: u32 = 0;
    let mut by_tag: HashMap<String, TagStats> = HashMap::new();

    for entry in usage {
        total_planned_events += entry.times_planned;
        total_completed_events += entry.times_completed;

        for tag in &entry.tags {
            let tag = tag.to_lowercase();
            let stats = by_tag
                .entry(tag.clone())
                .or_insert_with(|| TagStats::new(tag));
            stats.times_planned += entry.times_planned;
            stats.times_completed += entry.times_completed;
        }
    }

    let overall_completion_rate = if total_planned_events > 0 {
        f64::from(total_completed_events) / f64::from(total_planned_events)
    } else {
        0.0
    };

    let mut tag_stats: Vec<TagStats> = by_tag.into_values().collect();
    tag_stats.sort_by(|a, b| {
        b.completion_rate()
            .partial_cmp(&a.completion_rate())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.times_planned.cmp(&a.times_planned))
    });

    PlannerInsights {
        total_tasks,
        total_planned_events,
        total_completed_events,
        overall_completion_rate,
        tag_stats,
    }
}
