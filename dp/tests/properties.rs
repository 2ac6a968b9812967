//! Property tests for the planning core
//!
//! Randomized checks of the invariants the rest of the system leans on:
//! terminal tasks never reach a plan, a day never schedules a task twice,
//! a block with candidates is never left empty, and history only touches
//! scores once a task has been planned at least twice.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use dayplanner::block::fill_block;
use dayplanner::dayplan::build_day_plan;
use dayplanner::domain::{DayBlockSpec, FilterSpec, Mode, Task, filter_tasks, is_terminal_status};
use dayplanner::history::{TaskHistoryStats, TaskStatsMap};
use dayplanner::scoring::{rank_tasks, score_task, score_task_with_history};
use dayplanner::store::TaskStore;
use proptest::prelude::*;
use tempfile::TempDir;

fn fixed_now() -> DateTime<Utc> {
    "2025-06-15T12:00:00Z".parse().unwrap()
}

fn arb_mode() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Rest), Just(Mode::Balance), Just(Mode::Focus)]
}

fn arb_status() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("open".to_string()),
        Just("todo".to_string()),
        Just("in_progress".to_string()),
        Just("done".to_string()),
        Just("Cancelled".to_string()),
        Just("archived".to_string()),
        "[a-z]{3,8}",
    ]
}

fn arb_tags() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            Just("universe".to_string()),
            Just("deep-work".to_string()),
            Just("self-care".to_string()),
            Just("writing".to_string()),
        ],
        0..3,
    )
}

fn arb_task() -> impl Strategy<Value = Task> {
    (
        arb_status(),
        prop::option::of(1..=3i64),
        prop::option::of(5..=120i64),
        arb_tags(),
        prop::option::of(0..=60i64),
        prop::option::of(-3..=10i64),
    )
        .prop_map(|(status, priority, estimated, tags, created_days_ago, due_in_days)| {
            let now = fixed_now();
            let mut task = Task::new("t", "placeholder").with_status(status).with_tags(tags);
            if let Some(p) = priority {
                task = task.with_priority(p);
            }
            if let Some(minutes) = estimated {
                task = task.with_estimated_minutes(minutes);
            }
            if let Some(days) = created_days_ago {
                task = task.with_created_at(now - Duration::days(days));
            }
            if let Some(days) = due_in_days {
                task = task.with_due_date(now + Duration::days(days));
            }
            task
        })
}

/// A pool of tasks with distinct ids and titles
fn arb_tasks(max: usize) -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(arb_task(), 0..=max).prop_map(|tasks| {
        tasks
            .into_iter()
            .enumerate()
            .map(|(i, mut task)| {
                task.id = format!("t{i}");
                task.title = format!("task {i}");
                task
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_open_status_filter_never_passes_terminal_tasks(tasks in arb_tasks(12)) {
        let spec = FilterSpec::new().with_statuses(["open"]);
        let kept = filter_tasks(&tasks, &spec);
        prop_assert!(kept.iter().all(|t| !is_terminal_status(&t.status)));
    }

    #[test]
    fn prop_day_plan_never_schedules_a_task_twice(
        tasks in arb_tasks(10),
        base_mode in arb_mode(),
    ) {
        let specs = [
            DayBlockSpec::new("one", Mode::Focus).with_duration_minutes(50).with_max_tasks(2),
            DayBlockSpec::new("two", Mode::Balance).with_duration_minutes(50).with_max_tasks(2),
            DayBlockSpec::new("three", Mode::Rest).with_duration_minutes(50).with_max_tasks(2),
        ];
        let day = build_day_plan(base_mode, &specs, &tasks, &FilterSpec::new(), None, fixed_now());

        let ids = day.selected_task_ids();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len(), "a task appeared in two blocks");

        let pool: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        prop_assert!(ids.iter().all(|id| pool.contains(id)));
    }

    #[test]
    fn prop_block_with_candidates_always_selects_at_least_one(
        tasks in arb_tasks(8),
        mode in arb_mode(),
        duration in 10..=120i64,
        max_tasks in 1..=5usize,
        default_minutes in 5..=60i64,
    ) {
        prop_assume!(!tasks.is_empty());
        let ranked = rank_tasks(&tasks, mode, None, fixed_now());
        let top_id = ranked[0].task.id.clone();

        let spec = DayBlockSpec::new("block", mode)
            .with_duration_minutes(duration)
            .with_max_tasks(max_tasks)
            .with_default_task_minutes(default_minutes);
        let plan = fill_block(ranked, &spec);

        // The top candidate is admitted even when it alone busts the budget
        prop_assert!(!plan.tasks.is_empty());
        prop_assert_eq!(plan.tasks[0].task.id.clone(), top_id);
        prop_assert!(plan.tasks.len() <= max_tasks);

        let expected: i64 = plan
            .tasks
            .iter()
            .map(|p| p.task.estimated_minutes.unwrap_or(default_minutes))
            .sum();
        prop_assert_eq!(plan.total_estimated_minutes, expected);
    }

    #[test]
    fn prop_scoring_ignores_history_below_two_plannings(
        task in arb_task(),
        mode in arb_mode(),
        planned in 0u32..=1,
        planned_once_completed in any::<bool>(),
    ) {
        let base = score_task(&task, mode, fixed_now());

        prop_assert_eq!(score_task_with_history(&task, mode, None, fixed_now()), base);

        let empty = TaskStatsMap::new();
        prop_assert_eq!(score_task_with_history(&task, mode, Some(&empty), fixed_now()), base);

        let mut other = TaskStatsMap::new();
        other.insert(
            "someone-else".to_string(),
            TaskHistoryStats {
                task_id: "someone-else".to_string(),
                times_planned: 5,
                times_completed: 4,
            },
        );
        prop_assert_eq!(score_task_with_history(&task, mode, Some(&other), fixed_now()), base);

        let completed = u32::from(planned == 1 && planned_once_completed);
        let mut sparse = TaskStatsMap::new();
        sparse.insert(
            task.id.clone(),
            TaskHistoryStats {
                task_id: task.id.clone(),
                times_planned: planned,
                times_completed: completed,
            },
        );
        prop_assert_eq!(score_task_with_history(&task, mode, Some(&sparse), fixed_now()), base);
    }

    #[test]
    fn prop_completion_rate_is_a_ratio(
        (planned, completed) in (0u32..=50).prop_flat_map(|p| (Just(p), 0..=p))
    ) {
        let stats = TaskHistoryStats {
            task_id: "t".to_string(),
            times_planned: planned,
            times_completed: completed,
        };
        let rate = stats.completion_rate();

        prop_assert!((0.0..=1.0).contains(&rate));
        if planned == 0 {
            prop_assert_eq!(rate, 0.0);
        }
        prop_assert_eq!(rate == 0.0, completed == 0);
    }

    #[test]
    fn prop_store_round_trip_preserves_tasks(tasks in arb_tasks(6)) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = TaskStore::new(temp_dir.path().join("tasks.jsonl"));
        store.save(&tasks).expect("Failed to save tasks");
        let loaded = store.load().expect("Failed to load tasks");
        prop_assert_eq!(loaded, tasks);
    }
}
