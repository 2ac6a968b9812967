//! Plan value objects
//!
//! Transient results of scoring and allocation. Nothing here is persisted;
//! plans are rendered to markdown and later reviewed from that rendering.

use serde::{Deserialize, Serialize};

use super::mode::Mode;
use super::task::Task;

/// Named score components, kept per planned task for explainability
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Priority weight (priority * 1.5)
    pub priority: f64,
    /// Mode affinity of the task's tags
    pub tags: f64,
    /// Freshness bonus, linear decay over 30 days
    pub recency: f64,
    /// Deadline pressure
    pub deadline: f64,
    /// Historical completion-rate adjustment; 0 without enough history
    pub preference: f64,
}

impl ScoreBreakdown {
    /// Sum of all components
    pub fn total(&self) -> f64 {
        self.priority + self.tags + self.recency + self.deadline + self.preference
    }

    /// Components in rendering order
    pub fn components(&self) -> [(&'static str, f64); 5] {
        [
            ("priority", self.priority),
            ("tags", self.tags),
            ("recency", self.recency),
            ("deadline", self.deadline),
            ("preference", self.preference),
        ]
    }
}

/// A task with its score and the reasons behind it
#[derive(Debug, Clone, Serialize)]
pub struct PlannedTask {
    /// The scored task
    pub task: Task,
    /// Total score under the block's mode
    pub score: f64,
    /// Per-component breakdown summing to `score`
    pub reasons: ScoreBreakdown,
}

/// Tasks selected for one time block
#[derive(Debug, Clone, Serialize)]
pub struct PlanResult {
    /// Mode the block was scored under
    pub mode: Mode,
    /// Sum of the selected tasks' effective estimates
    pub total_estimated_minutes: i64,
    /// Selected tasks, highest score first
    pub tasks: Vec<PlannedTask>,
}

impl PlanResult {
    /// A well-formed plan with no tasks
    pub fn empty(mode: Mode) -> Self {
        Self {
            mode,
            total_estimated_minutes: 0,
            tasks: Vec::new(),
        }
    }
}

/// Configuration for one block of the day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayBlockSpec {
    /// Block label, e.g. "morning"
    pub name: String,

    /// Mode the block is planned under
    pub mode: Mode,

    /// Duration budget in minutes
    pub duration_minutes: i64,

    /// Maximum number of tasks admitted
    pub max_tasks: usize,

    /// Estimate used for tasks that carry none
    pub default_task_minutes: i64,
}

impl DayBlockSpec {
    /// Create a block spec with the standard budget (90 minutes, 5 tasks,
    /// 25-minute default estimate)
    pub fn new(name: impl Into<String>, mode: Mode) -> Self {
        Self {
            name: name.into(),
            mode,
            duration_minutes: 90,
            max_tasks: 5,
            default_task_minutes: 25,
        }
    }

    /// Set the duration budget
    pub fn with_duration_minutes(mut self, minutes: i64) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Set the task-count cap
    pub fn with_max_tasks(mut self, max_tasks: usize) -> Self {
        self.max_tasks = max_tasks;
        self
    }

    /// Set the fallback per-task estimate
    pub fn with_default_task_minutes(mut self, minutes: i64) -> Self {
        self.default_task_minutes = minutes;
        self
    }
}

/// One block's spec together with its plan
#[derive(Debug, Clone, Serialize)]
pub struct DayBlockPlan {
    /// The block configuration that produced the plan
    pub spec: DayBlockSpec,
    /// The tasks selected for the block
    pub plan: PlanResult,
}

/// A full day of block plans
#[derive(Debug, Clone, Serialize)]
pub struct DayPlanResult {
    /// Mode the day was composed around
    pub base_mode: Mode,
    /// Block plans in day order; task ids never repeat across blocks
    pub blocks: Vec<DayBlockPlan>,
}

impl DayPlanResult {
    /// Sum of estimated minutes across all blocks
    pub fn total_estimated_minutes(&self) -> i64 {
        self.blocks.iter().map(|b| b.plan.total_estimated_minutes).sum()
    }

    /// Every selected task id, in block order
    pub fn selected_task_ids(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .flat_map(|b| b.plan.tasks.iter().map(|pt| pt.task.id.as_str()))
            .collect()
    }
}
