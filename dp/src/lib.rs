//! DayPlanner - Preference-adaptive day planning engine
//!
//! Plans focus blocks and whole days over a JSONL task store, scoring
//! tasks per behavioral mode (rest / balance / focus) and learning from
//! what actually got done: reviewing a rendered plan appends per-task
//! outcomes to a history ledger, and those completion rates feed back
//! into future scores and the self-model's mode advice.
//!
//! # Core Concepts
//!
//! - **Modes bias scoring**: the same tasks rank differently under rest,
//!   balance, and focus
//! - **Plans are reviewable text**: any rendered plan can be reviewed as
//!   long as each task row keeps its `- id: ...` marker line
//! - **History closes the loop**: reviewed outcomes shift preference
//!   scores and drive tomorrow's suggested mode
//! - **State in files**: a read-whole/write-whole task store and an
//!   append-only history ledger, both line-oriented JSON
//!
//! # Modules
//!
//! - [`domain`] - Task model, filtering, modes, and plan result types
//! - [`scoring`] - Multi-factor per-mode task scoring
//! - [`block`] - Time-block allocation
//! - [`dayplan`] - Whole-day composition
//! - [`store`] - JSONL task store
//! - [`history`] - Execution history ledger and usage stats
//! - [`review`] - Execution review of rendered plans
//! - [`mood`] - Mood-file mode resolution
//! - [`selfmodel`] - Insights, recommendations, and mode orchestration
//! - [`render`] - Markdown renderers for plans and reviews
//! - [`planner`] - High-level facade
//! - [`config`] - Configuration types and loading

pub mod block;
pub mod config;
pub mod dayplan;
pub mod domain;
pub mod history;
pub mod mood;
pub mod planner;
pub mod render;
pub mod review;
pub mod scoring;
pub mod selfmodel;
pub mod store;

// Re-export commonly used types
pub use block::fill_block;
pub use config::{BlockConfig, PlannerConfig};
pub use dayplan::{block_modes, build_day_plan};
pub use domain::{
    DayBlockPlan, DayBlockSpec, DayPlanResult, FilterSpec, Mode, PlanResult, PlannedTask,
    ScoreBreakdown, TERMINAL_STATUSES, Task, filter_tasks, is_terminal_status, parse_datetime,
};
pub use history::{
    HistoryLedger, LedgerRecord, TaskHistoryStats, TaskStatsMap, TaskUsage, aggregate_task_stats,
    attach_task_metadata,
};
pub use mood::{MOOD_FILE_CANDIDATES, ModeResolution, resolve_mode};
pub use planner::{DayModePlan, Planner};
pub use render::{
    render_block_plan, render_daily_review, render_day_mode_plan, render_day_plan,
    render_execution_summary, render_insights, render_recommendations,
};
pub use review::{
    DailyReviewAggregate, ExecutionSummary, NamedExecutionSummary, TaskExecution,
    aggregate_summaries, parse_plan_task_ids, summarize_execution,
};
pub use scoring::{rank_tasks, score_task, score_task_with_history};
pub use selfmodel::{
    MIN_PLANNED_PER_TAG, ModeDecision, PlannerInsights, SelfModelRecommendations, TOP_N_TAGS,
    TagStats, build_recommendations, compute_insights, decide_day_mode, suggest_base_mode,
};
pub use store::{StoreError, TaskStore, find_task};
