//! Append-only planning history
//!
//! Every reviewed plan leaves one `task_execution` row per task plus one
//! `plan_summary` row in a JSONL file. Rows are never rewritten; scoring
//! preferences are recomputed from the full ledger on demand.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::review::ExecutionSummary;
use crate::store::StoreError;

/// One row of the planning history file, discriminated by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerRecord {
    /// Outcome of one task in one reviewed plan
    TaskExecution {
        timestamp: DateTime<Utc>,
        plan_name: String,
        task_id: String,
        title: Option<String>,
        status: Option<String>,
        is_completed: Option<bool>,
    },
    /// Aggregate outcome of one reviewed plan
    PlanSummary {
        timestamp: DateTime<Utc>,
        plan_name: String,
        total_planned: usize,
        found_tasks: usize,
        completed: usize,
        not_completed: usize,
        missing: usize,
        completion_rate: f64,
    },
}

/// Planning history bound to one JSONL file
pub struct HistoryLedger {
    path: PathBuf,
}

impl HistoryLedger {
    /// Create a ledger over the given file; nothing is touched on disk
    /// until the first append or load.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        debug!(?path, "HistoryLedger::new: opening history ledger");
        Self { path }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one reviewed plan: a `task_execution` row per classified task
    /// followed by a single `plan_summary` row, all sharing one timestamp.
    pub fn append_summary(
        &self,
        plan_name: &str,
        summary: &ExecutionSummary,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_err(e))?;
        let mut writer = BufWriter::new(file);

        for item in &summary.items {
            let record = LedgerRecord::TaskExecution {
                timestamp,
                plan_name: plan_name.to_string(),
                task_id: item.task_id.clone(),
                title: item.title.clone(),
                status: item.status.clone(),
                is_completed: item.is_completed,
            };
            writeln!(writer, "{}", serde_json::to_string(&record)?).map_err(|e| self.write_err(e))?;
        }

        let record = LedgerRecord::PlanSummary {
            timestamp,
            plan_name: plan_name.to_string(),
            total_planned: summary.total_planned,
            found_tasks: summary.found_tasks,
            completed: summary.completed,
            not_completed: summary.not_completed,
            missing: summary.missing,
            completion_rate: summary.completion_rate,
        };
        writeln!(writer, "{}", serde_json::to_string(&record)?).map_err(|e| self.write_err(e))?;
        writer.flush().map_err(|e| self.write_err(e))?;

        debug!(plan_name, rows = summary.items.len() + 1, "HistoryLedger::append_summary: appended rows");
        Ok(())
    }

    /// Load every decodable row
    ///
    /// A missing file is an empty ledger. Blank, malformed, and
    /// unrecognized rows are skipped with a warning.
    pub fn load(&self) -> Result<Vec<LedgerRecord>, StoreError> {
        if !self.path.exists() {
            debug!(path = ?self.path, "HistoryLedger::load: no ledger file yet");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.display().to_string(),
            source,
        })?;

        let mut records = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<LedgerRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(line, error = %e, "HistoryLedger::load: failed to parse row, skipping");
                }
            }
        }

        debug!(count = records.len(), "HistoryLedger::load: loaded rows");
        Ok(records)
    }

    /// Load the ledger and aggregate per-task statistics
    pub fn task_stats(&self) -> Result<super::TaskStatsMap, StoreError> {
        Ok(super::aggregate_task_stats(&self.load()?))
    }

    fn write_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.display().to_string(),
            source,
        }
    }
}
