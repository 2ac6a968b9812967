//! Task repository - line-oriented JSON task records
//!
//! Tasks live in a single JSONL file, one record per line. Loading is
//! lenient: blank and undecodable lines are skipped so one bad record
//! never poisons the store. Saving replaces the whole file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::Task;

/// Errors that can occur while reading or writing record stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create directory: {path}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read store file: {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write store file: {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Task repository bound to one JSONL file
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Create a repository over the given file; nothing is touched on disk
    /// until the first load or save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        debug!(?path, "TaskStore::new: opening task store");
        Self { path }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every task in the store
    ///
    /// A missing file is an empty store, not an error.
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        if !self.path.exists() {
            debug!(path = ?self.path, "TaskStore::load: no store file yet");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.display().to_string(),
            source,
        })?;

        let mut tasks = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(value) => {
                    if let Some(task) = Task::from_value(value) {
                        tasks.push(task);
                    } else {
                        warn!(line, "TaskStore::load: record is not an object, skipping");
                    }
                }
                Err(e) => {
                    warn!(line, error = %e, "TaskStore::load: failed to parse line, skipping");
                }
            }
        }

        debug!(count = tasks.len(), "TaskStore::load: loaded tasks");
        Ok(tasks)
    }

    /// Load only the tasks that still need planning
    pub fn open_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let tasks = self.load()?;
        Ok(tasks.into_iter().filter(|t| t.is_open()).collect())
    }

    /// Replace the entire store with the given tasks
    pub fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }

        let file = File::create(&self.path).map_err(|e| self.write_err(e))?;
        let mut writer = BufWriter::new(file);
        for task in tasks {
            let json = serde_json::to_string(task)?;
            writeln!(writer, "{}", json).map_err(|e| self.write_err(e))?;
        }
        writer.flush().map_err(|e| self.write_err(e))?;

        debug!(count = tasks.len(), path = ?self.path, "TaskStore::save: wrote tasks");
        Ok(())
    }

    /// Overwrite a task's title; false when the id is unknown
    pub fn set_title(&self, task_id: &str, title: &str) -> Result<bool, StoreError> {
        self.update_task(task_id, |task| task.title = title.trim().to_string())
    }

    /// Overwrite a task's priority; false when the id is unknown
    pub fn set_priority(&self, task_id: &str, priority: i64) -> Result<bool, StoreError> {
        self.update_task(task_id, |task| task.priority = Some(priority))
    }

    /// Overwrite a task's status; false when the id is unknown
    ///
    /// The status is stored as given (trimmed), it is not validated against
    /// any fixed set.
    pub fn set_status(&self, task_id: &str, status: &str) -> Result<bool, StoreError> {
        self.update_task(task_id, |task| task.status = status.trim().to_string())
    }

    fn update_task(&self, task_id: &str, apply: impl FnOnce(&mut Task)) -> Result<bool, StoreError> {
        let mut tasks = self.load()?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) else {
            return Ok(false);
        };
        apply(task);
        self.save(&tasks)?;
        Ok(true)
    }

    fn write_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Linear id lookup over a loaded snapshot
///
/// Legacy id spellings (`task_id`, `uuid`, ...) are folded into the
/// canonical id during decoding, so one comparison covers them all.
pub fn find_task<'a>(tasks: &'a [Task], task_id: &str) -> Option<&'a Task> {
    tasks.iter().find(|t| t.id == task_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = tempdir().unwrap();
        let store = TaskStore::new(temp.path().join("tasks.jsonl"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp = tempdir().unwrap();
        let store = TaskStore::new(temp.path().join("tasks.jsonl"));

        let tasks = vec![
            Task::new("t-1", "Write report").with_priority(2).with_tags(["deep-work"]),
            Task::new("t-2", "Stretch").with_status("done"),
        ];
        store.save(&tasks).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, tasks);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp = tempdir().unwrap();
        let store = TaskStore::new(temp.path().join("data").join("tasks").join("tasks.jsonl"));
        store.save(&[Task::new("t-1", "x")]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_load_skips_blank_and_malformed_lines() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tasks.jsonl");
        fs::write(
            &path,
            concat!(
                "{\"id\": \"t-1\", \"title\": \"good\"}\n",
                "\n",
                "not json at all\n",
                "[1, 2, 3]\n",
                "{\"id\": \"t-2\", \"title\": \"also good\"}\n",
            ),
        )
        .unwrap();

        let store = TaskStore::new(&path);
        let tasks = store.load().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "t-1");
        assert_eq!(tasks[1].id, "t-2");
    }

    #[test]
    fn test_save_preserves_unknown_fields() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tasks.jsonl");
        fs::write(&path, "{\"id\": \"t-1\", \"title\": \"x\", \"origin\": \"journal\"}\n").unwrap();

        let store = TaskStore::new(&path);
        let tasks = store.load().unwrap();
        store.save(&tasks).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded[0].extra["origin"], serde_json::json!("journal"));
    }

    #[test]
    fn test_open_tasks_filters_terminal_statuses() {
        let temp = tempdir().unwrap();
        let store = TaskStore::new(temp.path().join("tasks.jsonl"));
        store
            .save(&[
                Task::new("t-1", "open one"),
                Task::new("t-2", "done one").with_status("done"),
                Task::new("t-3", "cancelled one").with_status("Cancelled"),
                Task::new("t-4", "in progress").with_status("in_progress"),
            ])
            .unwrap();

        let open = store.open_tasks().unwrap();
        let ids: Vec<&str> = open.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t-1", "t-4"]);
    }

    #[test]
    fn test_find_task_matches_legacy_id_spelling() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tasks.jsonl");
        fs::write(&path, "{\"task_id\": \"legacy-1\", \"title\": \"old record\"}\n").unwrap();

        let tasks = TaskStore::new(&path).load().unwrap();
        assert!(find_task(&tasks, "legacy-1").is_some());
        assert!(find_task(&tasks, "nope").is_none());
    }

    #[test]
    fn test_set_status_updates_and_persists() {
        let temp = tempdir().unwrap();
        let store = TaskStore::new(temp.path().join("tasks.jsonl"));
        store.save(&[Task::new("t-1", "x"), Task::new("t-2", "y")]).unwrap();

        assert!(store.set_status("t-1", " done ").unwrap());
        assert!(!store.set_status("missing", "done").unwrap());

        let tasks = store.load().unwrap();
        assert_eq!(tasks[0].status, "done");
        assert_eq!(tasks[1].status, "open");
    }

    #[test]
    fn test_set_title_and_priority() {
        let temp = tempdir().unwrap();
        let store = TaskStore::new(temp.path().join("tasks.jsonl"));
        store.save(&[Task::new("t-1", "old title")]).unwrap();

        assert!(store.set_title("t-1", "  new title  ").unwrap());
        assert!(store.set_priority("t-1", 3).unwrap());
        assert!(!store.set_priority("missing", 1).unwrap());

        let task = store.load().unwrap().remove(0);
        assert_eq!(task.title, "new title");
        assert_eq!(task.priority, Some(3));
    }
}
