//! Whole-day composition
//!
//! A day is a sequence of blocks, each planned under its own mode. Tasks
//! selected by an earlier block are withdrawn from the pool before the
//! next block is ranked, so no task appears twice in a day.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::debug;

use crate::block::fill_block;
use crate::domain::{
    DayBlockPlan, DayBlockSpec, DayPlanResult, FilterSpec, Mode, PlanResult, Task, filter_tasks,
};
use crate::history::TaskStatsMap;
use crate::scoring::rank_tasks;

/// Per-block modes a base mode expands to, in block order
///
/// Rest days wind down through a lighter middle, focus days front-load
/// deep work, balance days taper from focus to rest.
pub fn block_modes(base_mode: Mode) -> [Mode; 3] {
    match base_mode {
        Mode::Rest => [Mode::Rest, Mode::Balance, Mode::Rest],
        Mode::Focus => [Mode::Focus, Mode::Focus, Mode::Rest],
        Mode::Balance => [Mode::Focus, Mode::Balance, Mode::Rest],
    }
}

/// Plan a full day over a snapshot of tasks
///
/// Terminal tasks and tasks rejected by `filter_spec` never enter the
/// pool. An empty pool yields a result with no blocks at all; a pool
/// exhausted mid-day yields empty plans for the remaining blocks.
pub fn build_day_plan(
    base_mode: Mode,
    block_specs: &[DayBlockSpec],
    tasks: &[Task],
    filter_spec: &FilterSpec,
    history: Option<&TaskStatsMap>,
    now: DateTime<Utc>,
) -> DayPlanResult {
    let mut remaining = filter_tasks(tasks.iter().filter(|t| t.is_open()), filter_spec);
    debug!(
        base_mode = %base_mode,
        total = tasks.len(),
        eligible = remaining.len(),
        "build_day_plan: pool ready"
    );

    if remaining.is_empty() {
        return DayPlanResult {
            base_mode,
            blocks: Vec::new(),
        };
    }

    let mut blocks: Vec<DayBlockPlan> = Vec::with_capacity(block_specs.len());
    for spec in block_specs {
        if remaining.is_empty() {
            blocks.push(DayBlockPlan {
                spec: spec.clone(),
                plan: PlanResult::empty(spec.mode),
            });
            continue;
        }

        let ranked = rank_tasks(&remaining, spec.mode, history, now);
        let plan = fill_block(ranked, spec);

        let used: HashSet<String> = plan.tasks.iter().map(|pt| pt.task.id.clone()).collect();
        remaining.retain(|t| !used.contains(&t.id));

        blocks.push(DayBlockPlan {
            spec: spec.clone(),
            plan,
        });
    }

    DayPlanResult { base_mode, blocks }
}
