//! Task pool filtering
//!
//! A `FilterSpec` narrows the pool before scoring. Unset criteria do not
//! participate; the input order of surviving tasks is preserved.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::task::Task;

/// Criteria for narrowing the task pool. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Status allow-set, compared case-insensitively
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<HashSet<String>>,

    /// Lower priority bound, enforced only on tasks that have a priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_priority: Option<i64>,

    /// Upper priority bound, enforced only on tasks that have a priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority: Option<i64>,

    /// Keep tasks carrying at least one of these tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_tags: Option<HashSet<String>>,

    /// Drop tasks carrying any of these tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_tags: Option<HashSet<String>>,

    /// Case-insensitive substring match over title and tags
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl FilterSpec {
    /// Create an empty spec that keeps everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to the given statuses
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.statuses = Some(statuses.into_iter().map(Into::into).collect());
        self
    }

    /// Set the lower priority bound
    pub fn with_min_priority(mut self, min: i64) -> Self {
        self.min_priority = Some(min);
        self
    }

    /// Set the upper priority bound
    pub fn with_max_priority(mut self, max: i64) -> Self {
        self.max_priority = Some(max);
        self
    }

    /// Keep only tasks carrying at least one of these tags
    pub fn with_include_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.include_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Drop tasks carrying any of these tags
    pub fn with_exclude_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set the substring search
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Check a single task against every set criterion
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(statuses) = &self.statuses {
            let status = task.status.to_lowercase();
            if !statuses.iter().any(|s| s.to_lowercase() == status) {
                return false;
            }
        }

        if let (Some(min), Some(priority)) = (self.min_priority, task.priority) {
            if priority < min {
                return false;
            }
        }

        if let (Some(max), Some(priority)) = (self.max_priority, task.priority) {
            if priority > max {
                return false;
            }
        }

        if let Some(include) = &self.include_tags {
            if !include.iter().any(|tag| task.has_tag(tag)) {
                return false;
            }
        }

        if let Some(exclude) = &self.exclude_tags {
            if exclude.iter().any(|tag| task.has_tag(tag)) {
                return false;
            }
        }

        if let Some(search) = &self.search {
            if !search.is_empty() {
                let haystack = format!("{} {}", task.title, task.tags.join(" ")).to_lowercase();
                if !haystack.contains(&search.to_lowercase()) {
                    return false;
                }
            }
        }

        true
    }
}

/// Apply a FilterSpec to a task slice, preserving input order
pub fn filter_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>, spec: &FilterSpec) -> Vec<Task> {
    tasks.into_iter().filter(|t| spec.matches(t)).cloned().collect()
}
