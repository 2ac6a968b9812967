//! Core domain types for planning

mod filter;
mod mode;
mod plan;
mod task;

pub use filter::{FilterSpec, filter_tasks};
pub use mode::Mode;
pub use plan::{DayBlockPlan, DayBlockSpec, DayPlanResult, PlanResult, PlannedTask, ScoreBreakdown};
pub use task::{TERMINAL_STATUSES, Task, is_terminal_status, parse_datetime};
