//! Per-task statistics aggregated from the ledger

use std::collections::HashMap;

use serde::Serialize;

use super::ledger::LedgerRecord;
use crate::domain::Task;

/// How often one task has been planned and completed across all history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskHistoryStats {
    pub task_id: String,
    pub times_planned: u32,
    pub times_completed: u32,
}

impl TaskHistoryStats {
    /// Fresh stats with zero counts
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            times_planned: 0,
            times_completed: 0,
        }
    }

    /// Completed share of planned appearances; 0 when never planned
    pub fn completion_rate(&self) -> f64 {
        if self.times_planned == 0 {
            return 0.0;
        }
        f64::from(self.times_completed) / f64::from(self.times_planned)
    }
}

/// Per-task statistics keyed by task id
pub type TaskStatsMap = HashMap<String, TaskHistoryStats>;

/// Group `task_execution` rows by task id
///
/// `times_planned` counts every appearance; `times_completed` counts only
/// rows whose is_completed is explicitly true. Other row kinds are ignored.
pub fn aggregate_task_stats(records: &[LedgerRecord]) -> TaskStatsMap {
    let mut stats = TaskStatsMap::new();

    for record in records {
        let LedgerRecord::TaskExecution { task_id, is_completed, .. } = record else {
            continue;
        };

        let entry = stats
            .entry(task_id.clone())
            .or_insert_with(|| TaskHistoryStats::new(task_id.clone()));
        entry.times_planned += 1;
        if *is_completed == Some(true) {
            entry.times_completed += 1;
        }
    }

    stats
}

/// A task's history joined with its current title and tags
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskUsage {
    pub task_id: String,
    /// None when the task has left the store
    pub title: Option<String>,
    /// Empty when the task has left the store
    pub tags: Vec<String>,
    pub times_planned: u32,
    pub times_completed: u32,
    pub completion_rate: f64,
}

/// Join stats with the current task snapshot
///
/// Tasks that have left the store keep their counts but lose title and tags.
pub fn attach_task_metadata(stats: &TaskStatsMap, tasks: &[Task]) -> Vec<TaskUsage> {
    let by_id: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();

    stats
        .values()
        .map(|st| {
            let task = by_id.get(st.task_id.as_str());
            TaskUsage {
                task_id: st.task_id.clone(),
                title: task.map(|t| t.title.clone()),
                tags: task.map(|t| t.tags.clone()).unwrap_or_default(),
                times_planned: st.times_planned,
                times_completed: st.times_completed,
                completion_rate: st.completion_rate(),
            }
        })
        .collect()
}
