//! Planning history: the ledger and what scoring learns from it

mod ledger;
mod stats;

pub use ledger::{HistoryLedger, LedgerRecord};
pub use stats::{TaskHistoryStats, TaskStatsMap, TaskUsage, aggregate_task_stats, attach_task_metadata};
