//! Planner facade wiring stores, scoring, and the self model together
//!
//! Owns the task store and history ledger configured in [`PlannerConfig`]
//! and exposes the planning, review, and self-model entry points. Every
//! operation reads fresh snapshots and captures "now" once, so one
//! invocation sees one consistent clock reading.

use chrono::Utc;
use eyre::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::block::fill_block;
use crate::config::PlannerConfig;
use crate::dayplan::{block_modes, build_day_plan};
use crate::domain::{DayBlockSpec, DayPlanResult, FilterSpec, Mode, PlanResult, filter_tasks};
use crate::history::{HistoryLedger, TaskStatsMap, attach_task_metadata};
use crate::mood::{self, ModeResolution};
use crate::review::{
    DailyReviewAggregate, ExecutionSummary, NamedExecutionSummary, aggregate_summaries,
    parse_plan_task_ids, summarize_execution,
};
use crate::scoring::rank_tasks;
use crate::selfmodel::{
    ModeDecision, PlannerInsights, SelfModelRecommendations, build_recommendations,
    compute_insights, decide_day_mode,
};
use crate::store::TaskStore;

/// A day's mode decision together with the plan built under it
#[derive(Debug, Clone, Serialize)]
pub struct DayModePlan {
    pub decision: ModeDecision,
    pub day_plan: DayPlanResult,
}

/// Facade over the task store, the history ledger, and the mood directory
pub struct Planner {
    config: PlannerConfig,
    store: TaskStore,
    ledger: HistoryLedger,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        let store = TaskStore::new(&config.tasks_path);
        let ledger = HistoryLedger::new(&config.history_path);
        Self {
            config,
            store,
            ledger,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    /// Plan a single block under one mode
    pub fn plan_block(&self, mode: Mode, filter_spec: &FilterSpec) -> Result<PlanResult> {
        let tasks = self.store.load().context("Failed to load tasks")?;
        let history = self.load_history_stats()?;
        let now = Utc::now();

        let pool = filter_tasks(tasks.iter().filter(|t| t.is_open()), filter_spec);
        let ranked = rank_tasks(&pool, mode, history.as_ref(), now);
        let spec = DayBlockSpec::new("block", mode)
            .with_max_tasks(self.config.max_tasks_per_block)
            .with_default_task_minutes(self.config.default_task_minutes);
        Ok(fill_block(ranked, &spec))
    }

    /// Plan a whole day under the given base mode
    pub fn plan_day(&self, base_mode: Mode, filter_spec: &FilterSpec) -> Result<DayPlanResult> {
        let tasks = self.store.load().context("Failed to load tasks")?;
        let history = self.load_history_stats()?;
        let now = Utc::now();

        let block_specs = self.day_block_specs(base_mode);
        Ok(build_day_plan(
            base_mode,
            &block_specs,
            &tasks,
            filter_spec,
            history.as_ref(),
            now,
        ))
    }

    /// Resolve today's mode from the configured mood directory
    pub fn resolve_mode(&self) -> ModeResolution {
        mood::resolve_mode(&self.config.mood_dir, self.config.preferred_mode.as_deref())
    }

    /// Full signal-driven day: mood file, self-model, then the day plan
    pub fn plan_day_from_signals(&self, filter_spec: &FilterSpec) -> Result<DayModePlan> {
        let resolution = self.resolve_mode();
        let insights = self.insights()?;
        let decision = decide_day_mode(resolution.mode, &insights);
        info!(
            mood = %decision.mood_mode,
            final_mode = %decision.final_mode,
            "plan_day_from_signals: mode decided"
        );

        let day_plan = self.plan_day(decision.final_mode, filter_spec)?;
        Ok(DayModePlan { decision, day_plan })
    }

    /// Review a rendered plan against the current task snapshot
    ///
    /// The resulting classifications are appended to the history ledger;
    /// this is the write that future preference scoring learns from.
    pub fn review_plan_text(&self, plan_name: &str, text: &str) -> Result<ExecutionSummary> {
        let task_ids = parse_plan_task_ids(text);
        let tasks = self.store.load().context("Failed to load tasks")?;
        let summary = summarize_execution(&task_ids, &tasks);

        let timestamp = Utc::now();
        self.ledger
            .append_summary(plan_name, &summary, timestamp)
            .context("Failed to append review to history ledger")?;
        info!(
            plan_name,
            planned = summary.total_planned,
            completed = summary.completed,
            missing = summary.missing,
            "review_plan: appended execution review to ledger"
        );
        Ok(summary)
    }

    /// Review a plan document on disk, named after its file stem
    pub fn review_plan_file(&self, path: &Path) -> Result<ExecutionSummary> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file: {}", path.display()))?;
        self.review_plan_text(&plan_name_of(path), &text)
    }

    /// Review every given plan file and aggregate the day's totals
    pub fn daily_review(&self, plan_paths: &[PathBuf]) -> Result<DailyReviewAggregate> {
        let mut plans = Vec::with_capacity(plan_paths.len());
        for path in plan_paths {
            let summary = self.review_plan_file(path)?;
            plans.push(NamedExecutionSummary {
                plan_name: plan_name_of(path),
                summary,
            });
        }
        Ok(aggregate_summaries(plans))
    }

    /// Compute the self-model portrait from ledger and task store
    pub fn insights(&self) -> Result<PlannerInsights> {
        let stats = self
            .ledger
            .task_stats()
            .context("Failed to aggregate planning history")?;
        if stats.is_empty() {
            return Ok(PlannerInsights::empty());
        }

        let tasks = self.store.load().context("Failed to load tasks")?;
        let usage = attach_task_metadata(&stats, &tasks);
        Ok(compute_insights(&usage))
    }

    /// Strategy recommendations derived from [`Planner::insights`]
    pub fn recommendations(&self) -> Result<SelfModelRecommendations> {
        Ok(build_recommendations(self.insights()?))
    }

    fn load_history_stats(&self) -> Result<Option<TaskStatsMap>> {
        let stats = self
            .ledger
            .task_stats()
            .context("Failed to aggregate planning history")?;
        Ok((!stats.is_empty()).then_some(stats))
    }

    /// Config blocks zipped with the per-mode table; blocks beyond the
    /// table keep the base mode
    fn day_block_specs(&self, base_mode: Mode) -> Vec<DayBlockSpec> {
        let modes = block_modes(base_mode);
        self.config
            .blocks
            .iter()
            .enumerate()
            .map(|(i, block)| {
                DayBlockSpec::new(&block.name, modes.get(i).copied().unwrap_or(base_mode))
                    .with_duration_minutes(block.duration_minutes)
                    .with_max_tasks(self.config.max_tasks_per_block)
                    .with_default_task_minutes(self.config.default_task_minutes)
            })
            .collect()
    }
}

fn plan_name_of(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("plan")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlockConfig;
    use crate::domain::Task;
    use crate::history::LedgerRecord;
    use tempfile::tempdir;

    fn planner_in(root: &Path) -> Planner {
        Planner::new(PlannerConfig::with_root(root))
    }

    fn seed_tasks(planner: &Planner) {
        let tasks = vec![
            Task::new("deep", "Write the hard chapter")
                .with_priority(3)
                .with_tags(["universe"])
                .with_estimated_minutes(45),
            Task::new("care", "Go for a walk")
                .with_priority(1)
                .with_tags(["self-care"])
                .with_estimated_minutes(30),
            Task::new("done", "Already shipped")
                .with_status("done")
                .with_tags(["universe"]),
        ];
        planner.store().save(&tasks).unwrap();
    }

    #[test]
    fn test_new_wires_paths_from_config() {
        let dir = tempdir().unwrap();
        let config = PlannerConfig::with_root(dir.path());
        let planner = Planner::new(config.clone());

        assert_eq!(planner.store().path(), config.tasks_path.as_path());
        assert_eq!(planner.ledger().path(), config.history_path.as_path());
        assert_eq!(planner.config().max_tasks_per_block, 5);
    }

    #[test]
    fn test_plan_block_scores_under_the_given_mode() {
        let dir = tempdir().unwrap();
        let planner = planner_in(dir.path());
        seed_tasks(&planner);

        let plan = planner.plan_block(Mode::Focus, &FilterSpec::new()).unwrap();
        assert_eq!(plan.mode, Mode::Focus);
        assert_eq!(plan.tasks[0].task.id, "deep");
        // terminal tasks never enter the pool
        assert!(plan.tasks.iter().all(|pt| pt.task.id != "done"));

        let plan = planner.plan_block(Mode::Rest, &FilterSpec::new()).unwrap();
        assert_eq!(plan.tasks[0].task.id, "care");
    }

    #[test]
    fn test_plan_block_with_no_store_is_empty() {
        let dir = tempdir().unwrap();
        let planner = planner_in(dir.path());

        let plan = planner.plan_block(Mode::Balance, &FilterSpec::new()).unwrap();
        assert!(plan.tasks.is_empty());
        assert_eq!(plan.total_estimated_minutes, 0);
    }

    #[test]
    fn test_plan_day_builds_specs_from_config_blocks() {
        let dir = tempdir().unwrap();
        let mut config = PlannerConfig::with_root(dir.path());
        config.blocks = vec![
            BlockConfig {
                name: "morning".to_string(),
                duration_minutes: 120,
            },
            BlockConfig {
                name: "afternoon".to_string(),
                duration_minutes: 90,
            },
            BlockConfig {
                name: "evening".to_string(),
                duration_minutes: 60,
            },
            BlockConfig {
                name: "late".to_string(),
                duration_minutes: 30,
            },
        ];
        let planner = Planner::new(config);
        seed_tasks(&planner);

        let day_plan = planner.plan_day(Mode::Focus, &FilterSpec::new()).unwrap();
        assert_eq!(day_plan.base_mode, Mode::Focus);
        assert_eq!(day_plan.blocks.len(), 4);
        assert_eq!(day_plan.blocks[0].spec.name, "morning");
        assert_eq!(day_plan.blocks[0].spec.mode, Mode::Focus);
        assert_eq!(day_plan.blocks[0].spec.duration_minutes, 120);
        assert_eq!(day_plan.blocks[2].spec.mode, Mode::Rest);
        // blocks beyond the mode table fall back to the base mode
        assert_eq!(day_plan.blocks[3].spec.mode, Mode::Focus);
    }

    #[test]
    fn test_review_plan_text_appends_classifications() {
        let dir = tempdir().unwrap();
        let planner = planner_in(dir.path());
        seed_tasks(&planner);

        let text = "- id: `deep`\n- id: `done`\n- id: `vanished`\n";
        let summary = planner.review_plan_text("evening_plan", text).unwrap();

        assert_eq!(summary.total_planned, 3);
        assert_eq!(summary.found_tasks, 2);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.not_completed, 1);
        assert_eq!(summary.missing, 1);

        let records = planner.ledger().load().unwrap();
        assert_eq!(records.len(), 4);
        match &records[0] {
            LedgerRecord::TaskExecution { plan_name, task_id, .. } => {
                assert_eq!(plan_name, "evening_plan");
                assert_eq!(task_id, "deep");
            }
            other => panic!("expected task_execution, got {other:?}"),
        }
        assert!(matches!(records[3], LedgerRecord::PlanSummary { .. }));
    }

    #[test]
    fn test_review_plan_file_is_named_after_the_stem() {
        let dir = tempdir().unwrap();
        let planner = planner_in(dir.path());
        seed_tasks(&planner);

        let plan_path = dir.path().join("morning_focus.md");
        fs::write(&plan_path, "- id: `care`\n").unwrap();

        planner.review_plan_file(&plan_path).unwrap();
        let records = planner.ledger().load().unwrap();
        match &records[0] {
            LedgerRecord::TaskExecution { plan_name, .. } => {
                assert_eq!(plan_name, "morning_focus");
            }
            other => panic!("expected task_execution, got {other:?}"),
        }
    }

    #[test]
    fn test_daily_review_aggregates_all_plan_files() {
        let dir = tempdir().unwrap();
        let planner = planner_in(dir.path());
        seed_tasks(&planner);

        let first = dir.path().join("morning.md");
        fs::write(&first, "- id: `deep`\n- id: `done`\n").unwrap();
        let second = dir.path().join("evening.md");
        fs::write(&second, "- id: `care`\n").unwrap();

        let agg = planner.daily_review(&[first, second]).unwrap();
        assert_eq!(agg.total_plans, 2);
        assert_eq!(agg.total_planned, 3);
        assert_eq!(agg.total_found, 3);
        assert_eq!(agg.total_completed, 1);
        assert_eq!(agg.plans[0].plan_name, "morning");
        assert_eq!(agg.plans[1].plan_name, "evening");

        // both reviews landed in the ledger: 2 + 1 task rows, 2 summaries
        let records = planner.ledger().load().unwrap();
        assert_eq!(records.len(), 5);
    }

    #[test]
    fn test_insights_empty_without_history() {
        let dir = tempdir().unwrap();
        let planner = planner_in(dir.path());
        seed_tasks(&planner);

        let insights = planner.insights().unwrap();
        assert_eq!(insights, PlannerInsights::empty());

        let rec = planner.recommendations().unwrap();
        assert_eq!(rec.suggested_base_mode, Mode::Balance);
        assert!(rec.strength_tags.is_empty());
    }

    #[test]
    fn test_insights_join_ledger_with_task_tags() {
        let dir = tempdir().unwrap();
        let planner = planner_in(dir.path());
        seed_tasks(&planner);

        planner.review_plan_text("p1", "- id: `deep`\n- id: `care`\n").unwrap();
        planner.review_plan_text("p2", "- id: `deep`\n").unwrap();

        let insights = planner.insights().unwrap();
        assert_eq!(insights.total_tasks, 2);
        assert_eq!(insights.total_planned_events, 3);
        let universe = insights.tag("universe").unwrap();
        assert_eq!(universe.times_planned, 2);
    }

    #[test]
    fn test_plan_day_from_signals_defers_to_mood_without_history() {
        let dir = tempdir().unwrap();
        let planner = planner_in(dir.path());
        seed_tasks(&planner);

        fs::create_dir_all(planner.config().mood_dir.as_path()).unwrap();
        fs::write(
            planner.config().mood_dir.join("today_mood.json"),
            r#"{"mode": "rest"}"#,
        )
        .unwrap();

        let result = planner.plan_day_from_signals(&FilterSpec::new()).unwrap();
        assert_eq!(result.decision.mood_mode, Mode::Rest);
        assert_eq!(result.decision.self_model_mode, None);
        assert_eq!(result.decision.final_mode, Mode::Rest);
        assert_eq!(result.day_plan.base_mode, Mode::Rest);
        assert_eq!(result.day_plan.blocks.len(), 3);
    }

    #[test]
    fn test_plan_name_of_falls_back_for_odd_paths() {
        assert_eq!(plan_name_of(Path::new("plans/day_focus.md")), "day_focus");
        assert_eq!(plan_name_of(Path::new("noext")), "noext");
    }
}
