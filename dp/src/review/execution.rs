//! Plan execution review
//!
//! Reads back a rendered plan document, resolves every referenced task
//! against the current store snapshot, and classifies what actually
//! happened. The summary feeds the history ledger.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Task, is_terminal_status};

/// One planned task's outcome in a reviewed plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskExecution {
    /// Id extracted from the plan document
    pub task_id: String,
    /// Current title, None when the task has left the store
    pub title: Option<String>,
    /// Current status, None when the task has left the store
    pub status: Option<String>,
    /// Whether the task reached a terminal status; None when missing
    pub is_completed: Option<bool>,
}

/// Aggregate outcome of one reviewed plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionSummary {
    /// Number of ids extracted from the plan document
    pub total_planned: usize,
    /// Ids that resolved to a task in the store
    pub found_tasks: usize,
    pub completed: usize,
    pub not_completed: usize,
    pub missing: usize,
    /// completed / found_tasks, 0 when nothing was found
    pub completion_rate: f64,
    /// Per-task classifications in plan order
    pub items: Vec<TaskExecution>,
}

/// Extract task ids from a rendered plan document
///
/// The only structural contract with renderers: each task entry carries a
/// line of the form ``- id: `abc123` `` or `- id: abc123`. A backtick-quoted
/// token is preferred; otherwise everything after the first colon is taken.
pub fn parse_plan_task_ids(text: &str) -> Vec<String> {
    let mut ids = Vec::new();
    for line in text.lines() {
        let s = line.trim();
        if !s.starts_with("- id:") {
            continue;
        }

        if s.contains('`') {
            let mut parts = s.split('`');
            parts.next();
            if let Some(quoted) = parts.next() {
                let quoted = quoted.trim();
                if !quoted.is_empty() {
                    ids.push(quoted.to_string());
                    continue;
                }
            }
        }

        if let Some((_, tail)) = s.split_once(':') {
            let tail = tail.trim();
            if !tail.is_empty() {
                ids.push(tail.to_string());
            }
        }
    }
    ids
}

/// Classify a list of planned task ids against a task snapshot
pub fn summarize_execution(task_ids: &[String], tasks: &[Task]) -> ExecutionSummary {
    let by_id: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut items = Vec::with_capacity(task_ids.len());
    let mut found_tasks = 0;
    let mut completed = 0;
    let mut not_completed = 0;
    let mut missing = 0;

    for task_id in task_ids {
        let Some(task) = by_id.get(task_id.as_str()) else {
            items.push(TaskExecution {
                task_id: task_id.clone(),
                title: None,
                status: None,
                is_completed: None,
            });
            missing += 1;
            continue;
        };

        found_tasks += 1;
        let is_done = is_terminal_status(&task.status);
        if is_done {
            completed += 1;
        } else {
            not_completed += 1;
        }

        items.push(TaskExecution {
            task_id: task_id.clone(),
            title: Some(task.title.clone()),
            status: Some(task.status.clone()),
            is_completed: Some(is_done),
        });
    }

    let completion_rate = if found_tasks > 0 {
        completed as f64 / found_tasks as f64
    } else {
        0.0
    };

    ExecutionSummary {
        total_planned: task_ids.len(),
        found_tasks,
        completed,
        not_completed,
        missing,
        completion_rate,
        items,
    }
}
