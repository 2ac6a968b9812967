//! Planner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One time block of the day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    /// Block name, e.g. "morning"
    pub name: String,

    /// Minute budget for the block
    #[serde(rename = "duration-minutes")]
    pub duration_minutes: i64,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            duration_minutes: 90,
        }
    }
}

/// Main planner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// JSONL file holding the task store
    #[serde(rename = "tasks-path")]
    pub tasks_path: PathBuf,

    /// JSONL file holding the execution history ledger
    #[serde(rename = "history-path")]
    pub history_path: PathBuf,

    /// Directory probed for mood JSON files
    #[serde(rename = "mood-dir")]
    pub mood_dir: PathBuf,

    /// Day blocks in planning order
    pub blocks: Vec<BlockConfig>,

    /// Task cap per block
    #[serde(rename = "max-tasks-per-block")]
    pub max_tasks_per_block: usize,

    /// Estimate assumed for tasks without one
    #[serde(rename = "default-task-minutes")]
    pub default_task_minutes: i64,

    /// Mode used when no mood file yields a signal
    #[serde(rename = "preferred-mode")]
    pub preferred_mode: Option<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/dayplanner on Linux)
        let data_root = dirs::data_dir()
            .map(|d| d.join("dayplanner"))
            .unwrap_or_else(|| PathBuf::from("data"));

        Self {
            tasks_path: data_root.join("tasks").join("tasks.jsonl"),
            history_path: data_root.join("plans").join("planner_history.jsonl"),
            mood_dir: data_root.join("mood"),
            blocks: default_blocks(),
            max_tasks_per_block: 5,
            default_task_minutes: 25,
            preferred_mode: None,
        }
    }
}

fn default_blocks() -> Vec<BlockConfig> {
    vec![
        BlockConfig {
            name: "morning".to_string(),
            duration_minutes: 90,
        },
        BlockConfig {
            name: "afternoon".to_string(),
            duration_minutes: 90,
        },
        BlockConfig {
            name: "evening".to_string(),
            duration_minutes: 60,
        },
    ]
}

impl PlannerConfig {
    /// Default configuration with all data files rooted under `root`
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            tasks_path: root.join("tasks").join("tasks.jsonl"),
            history_path: root.join("plans").join("planner_history.jsonl"),
            mood_dir: root.join("mood"),
            ..Self::default()
        }
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .dayplanner.yml
        let local_config = PathBuf::from(".dayplanner.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/dayplanner/dayplanner.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("dayplanner").join("dayplanner.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();

        assert!(config.tasks_path.ends_with("tasks/tasks.jsonl"));
        assert!(config.history_path.ends_with("plans/planner_history.jsonl"));
        assert!(config.mood_dir.ends_with("mood"));
        assert_eq!(config.blocks.len(), 3);
        assert_eq!(config.blocks[0].name, "morning");
        assert_eq!(config.blocks[2].duration_minutes, 60);
        assert_eq!(config.max_tasks_per_block, 5);
        assert_eq!(config.default_task_minutes, 25);
        assert_eq!(config.preferred_mode, None);
    }

    #[test]
    fn test_with_root_rebases_data_paths() {
        let config = PlannerConfig::with_root("/tmp/planner");

        assert_eq!(config.tasks_path, PathBuf::from("/tmp/planner/tasks/tasks.jsonl"));
        assert_eq!(
            config.history_path,
            PathBuf::from("/tmp/planner/plans/planner_history.jsonl")
        );
        assert_eq!(config.mood_dir, PathBuf::from("/tmp/planner/mood"));
        assert_eq!(config.blocks.len(), 3);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
tasks-path: data/tasks.jsonl
history-path: data/history.jsonl
mood-dir: data/mood

blocks:
  - name: deep-morning
    duration-minutes: 120
  - name: wind-down
    duration-minutes: 45

max-tasks-per-block: 3
default-task-minutes: 30
preferred-mode: focus
"#;

        let config: PlannerConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.tasks_path, PathBuf::from("data/tasks.jsonl"));
        assert_eq!(config.blocks.len(), 2);
        assert_eq!(config.blocks[0].name, "deep-morning");
        assert_eq!(config.blocks[0].duration_minutes, 120);
        assert_eq!(config.max_tasks_per_block, 3);
        assert_eq!(config.default_task_minutes, 30);
        assert_eq!(config.preferred_mode.as_deref(), Some("focus"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
max-tasks-per-block: 2
"#;

        let config: PlannerConfig = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.max_tasks_per_block, 2);

        // Defaults for unspecified
        assert_eq!(config.blocks.len(), 3);
        assert_eq!(config.default_task_minutes, 25);
        assert!(config.tasks_path.ends_with("tasks/tasks.jsonl"));
    }
}
