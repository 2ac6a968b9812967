//! Execution review: closing the loop between plans and reality

mod daily;
mod execution;

pub use daily::{DailyReviewAggregate, NamedExecutionSummary, aggregate_summaries};
pub use execution::{ExecutionSummary, TaskExecution, parse_plan_task_ids, summarize_execution};
