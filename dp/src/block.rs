//! Time-block allocation
//!
//! Walks a ranked list and admits tasks until the block's minute budget
//! or task cap is hit. The first task is always admitted even when its
//! estimate alone exceeds the budget, so a non-empty candidate pool never
//! produces an empty block.

use tracing::debug;

use crate::domain::{DayBlockSpec, PlanResult, PlannedTask};

/// Fill one block from an already-ranked candidate list
pub fn fill_block(ranked: Vec<PlannedTask>, spec: &DayBlockSpec) -> PlanResult {
    let mut selected: Vec<PlannedTask> = Vec::new();
    let mut total_minutes: i64 = 0;

    for planned in ranked {
        let est = planned.task.estimated_minutes.unwrap_or(spec.default_task_minutes);
        if !selected.is_empty() && total_minutes + est > spec.duration_minutes {
            continue;
        }

        total_minutes += est;
        selected.push(planned);
        if selected.len() >= spec.max_tasks {
            break;
        }
    }

    debug!(
        block = %spec.name,
        mode = %spec.mode,
        tasks = selected.len(),
        minutes = total_minutes,
        "fill_block: allocated"
    );

    PlanResult {
        mode: spec.mode,
        total_estimated_minutes: total_minutes,
        tasks: selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mode, ScoreBreakdown, Task};

    fn planned(id: &str, minutes: Option<i64>) -> PlannedTask {
        let mut task = Task::new(id, format!("task {id}"));
        if let Some(m) = minutes {
            task = task.with_estimated_minutes(m);
        }
        PlannedTask {
            task,
            score: 1.0,
            reasons: ScoreBreakdown::default(),
        }
    }

    fn spec() -> DayBlockSpec {
        DayBlockSpec::new("morning", Mode::Focus)
            .with_duration_minutes(90)
            .with_max_tasks(5)
            .with_default_task_minutes(25)
    }

    #[test]
    fn test_fills_until_budget_is_hit() {
        let ranked = vec![
            planned("1", Some(40)),
            planned("2", Some(40)),
            planned("3", Some(40)),
        ];

        let result = fill_block(ranked, &spec());
        let ids: Vec<&str> = result.tasks.iter().map(|pt| pt.task.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(result.total_estimated_minutes, 80);
        assert_eq!(result.mode, Mode::Focus);
    }

    #[test]
    fn test_first_task_admitted_even_over_budget() {
        let ranked = vec![planned("big", Some(240)), planned("2", Some(10))];

        let result = fill_block(ranked, &spec());
        assert_eq!(result.tasks.len(), 1);
        assert_eq!(result.tasks[0].task.id, "big");
        assert_eq!(result.total_estimated_minutes, 240);
    }

    #[test]
    fn test_skipped_task_does_not_block_later_fits() {
        // 60 admitted, 50 skipped (would overflow), 25 still fits
        let ranked = vec![
            planned("1", Some(60)),
            planned("2", Some(50)),
            planned("3", Some(25)),
        ];

        let result = fill_block(ranked, &spec());
        let ids: Vec<&str> = result.tasks.iter().map(|pt| pt.task.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(result.total_estimated_minutes, 85);
    }

    #[test]
    fn test_stops_at_max_tasks() {
        let ranked = (1..=6).map(|i| planned(&i.to_string(), Some(5))).collect();

        let result = fill_block(ranked, &spec().with_max_tasks(3));
        assert_eq!(result.tasks.len(), 3);
        assert_eq!(result.total_estimated_minutes, 15);
    }

    #[test]
    fn test_missing_estimate_uses_block_default() {
        let ranked = vec![planned("1", None), planned("2", None)];

        let result = fill_block(ranked, &spec().with_default_task_minutes(45));
        assert_eq!(result.tasks.len(), 2);
        assert_eq!(result.total_estimated_minutes, 90);
    }

    #[test]
    fn test_empty_input_gives_empty_plan() {
        let result = fill_block(Vec::new(), &spec());
        assert!(result.tasks.is_empty());
        assert_eq!(result.total_estimated_minutes, 0);
        assert_eq!(result.mode, Mode::Focus);
    }
}
