//! Multi-factor task scoring
//!
//! Each task gets a per-mode total built from priority, tag affinity,
//! recency, deadline pressure, and optionally a completion-rate preference
//! learned from the ledger. Callers capture `now` once and thread it
//! through so one ranking pass sees a single clock reading.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Mode, PlannedTask, ScoreBreakdown, Task};
use crate::history::TaskStatsMap;

fn priority_component(task: &Task) -> f64 {
    match task.priority {
        // priority is expected in the 1-3 range, scaled up a bit
        Some(p) => p as f64 * 1.5,
        None => 0.0,
    }
}

fn tag_component(task: &Task, mode: Mode) -> f64 {
    let self_care = task.has_tag("self-care");
    let deep_work = task.has_tag("universe") || task.has_tag("deep-work");

    let mut score = 0.0;
    match mode {
        Mode::Rest => {
            if self_care {
                score += 3.0;
            }
            if deep_work {
                score -= 2.0;
            }
        }
        Mode::Focus => {
            if deep_work {
                score += 3.0;
            }
            if self_care {
                score -= 1.0;
            }
        }
        Mode::Balance => {
            if self_care {
                score += 1.0;
            }
            if deep_work {
                score += 1.0;
            }
        }
    }
    score
}

fn recency_component(task: &Task, now: DateTime<Utc>) -> f64 {
    let Some(created_at) = task.created_at else {
        return 0.0;
    };

    let age_days = whole_days(now - created_at);
    if age_days <= 0 {
        return 1.0;
    }
    if age_days >= 30 {
        return 0.0;
    }
    1.0 - age_days as f64 / 30.0
}

fn deadline_component(task: &Task, now: DateTime<Utc>) -> f64 {
    let Some(due_date) = task.due_date else {
        return 0.0;
    };

    let days_left = whole_days(due_date - now);
    if days_left < 0 {
        // overdue tasks keep a reminder bonus
        return 1.0;
    }
    if days_left == 0 {
        return 1.5;
    }
    if days_left <= 3 {
        return 1.0;
    }
    if days_left <= 7 {
        return 0.5;
    }
    0.0
}

/// Whole days in a span, floored toward negative infinity. A deadline
/// missed by an hour is a day overdue, not due today.
fn whole_days(delta: Duration) -> i64 {
    match delta.num_microseconds() {
        Some(us) => us.div_euclid(86_400_000_000),
        None => delta.num_days(),
    }
}

/// Score a task on its own attributes, without history
pub fn score_task(task: &Task, mode: Mode, now: DateTime<Utc>) -> ScoreBreakdown {
    ScoreBreakdown {
        priority: priority_component(task),
        tags: tag_component(task, mode),
        recency: recency_component(task, now),
        deadline: deadline_component(task, now),
        preference: 0.0,
    }
}

/// Score a task with the completion-rate preference layered on top
///
/// A task planned fewer than two times keeps preference 0, so this agrees
/// exactly with [`score_task`] until history accumulates for it.
pub fn score_task_with_history(
    task: &Task,
    mode: Mode,
    history: Option<&TaskStatsMap>,
    now: DateTime<Utc>,
) -> ScoreBreakdown {
    let mut breakdown = score_task(task, mode, now);

    if let Some(stats) = history.and_then(|h| h.get(&task.id)) {
        if stats.times_planned >= 2 {
            // completion_rate is in [0,1]; centering on 0.5 lets poor
            // completion push the score down
            let centered = stats.completion_rate() - 0.5;
            // log growth amplifies the 2-5 plan range and saturates later
            let factor = f64::from(stats.times_planned).ln_1p() / 5.0_f64.ln_1p();
            breakdown.preference = centered * factor * 4.0;
        }
    }

    breakdown
}

/// Score every task under one mode and sort for allocation
///
/// Order: total descending, then priority descending (absent as 0), then
/// created_at ascending as the final deterministic tie-break.
pub fn rank_tasks(
    tasks: &[Task],
    mode: Mode,
    history: Option<&TaskStatsMap>,
    now: DateTime<Utc>,
) -> Vec<PlannedTask> {
    let mut scored: Vec<PlannedTask> = tasks
        .iter()
        .map(|task| {
            let reasons = score_task_with_history(task, mode, history, now);
            PlannedTask {
                task: task.clone(),
                score: reasons.total(),
                reasons,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.task.priority.unwrap_or(0).cmp(&a.task.priority.unwrap_or(0)))
            .then_with(|| a.task.created_at.cmp(&b.task.created_at))
    });

    scored
}
