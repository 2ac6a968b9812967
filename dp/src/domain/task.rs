//! Task model and lenient decoding
//!
//! Tasks originate in external editors and trackers, so decoding accepts
//! historical field spellings (`task_id`, `labels`, `createdAt`, ...) and
//! coerces loosely-typed values instead of rejecting records.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Statuses that mean a task no longer needs planning
pub const TERMINAL_STATUSES: [&str; 5] = ["done", "completed", "cancelled", "canceled", "archived"];

/// Naive datetime layouts accepted from task records, tried after RFC 3339.
/// Naive values are taken as UTC.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Check a status string against the terminal set, case-insensitively
pub fn is_terminal_status(status: &str) -> bool {
    let status = status.to_lowercase();
    TERMINAL_STATUSES.iter().any(|s| *s == status)
}

/// Parse a timestamp string from a task record
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// A single unit of plannable work
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    /// Unique identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Workflow status; free-form string, open unless in [`TERMINAL_STATUSES`]
    pub status: String,

    /// Numeric priority, larger is more important
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    /// Labels, case preserved but compared case-insensitively
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Expected duration in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<i64>,

    /// Creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last update timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Deadline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    /// Unrecognized fields, preserved verbatim across load/save round-trips
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Create a new open Task
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: "open".to_string(),
            priority: None,
            tags: Vec::new(),
            estimated_minutes: None,
            created_at: None,
            updated_at: None,
            due_date: None,
            extra: Map::new(),
        }
    }

    /// Set the status
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the estimated duration
    pub fn with_estimated_minutes(mut self, minutes: i64) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    /// Set the creation timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set the deadline
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Check whether the task still needs planning
    pub fn is_open(&self) -> bool {
        !is_terminal_status(&self.status)
    }

    /// Check whether any tag matches, case-insensitively
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }

    /// Decode a Task from a parsed JSON value. Returns None for non-objects;
    /// objects always decode, with unusable fields coerced to defaults.
    pub fn from_value(value: Value) -> Option<Self> {
        let obj = match value {
            Value::Object(obj) => obj,
            _ => return None,
        };

        let id = ["id", "task_id", "uuid", "_id"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(present).and_then(string_like))
            .unwrap_or_else(|| "unknown".to_string());

        let title = ["title", "name"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(present).and_then(string_like))
            .unwrap_or_else(|| "Untitled task".to_string());

        let status = obj
            .get("status")
            .and_then(present)
            .and_then(string_like)
            .unwrap_or_else(|| "open".to_string());

        let priority = obj.get("priority").and_then(priority_like);

        let tags = obj
            .get("tags")
            .and_then(present)
            .or_else(|| obj.get("labels").and_then(present))
            .map(tags_like)
            .unwrap_or_default();

        let estimated_minutes = obj
            .get("estimated_minutes")
            .and_then(present)
            .or_else(|| obj.get("estimate").and_then(present))
            .and_then(minutes_like);

        let created_at = timestamp_field(&obj, "created_at", "createdAt");
        let updated_at = timestamp_field(&obj, "updated_at", "updatedAt");
        let due_date = timestamp_field(&obj, "due_date", "dueDate");

        const KNOWN_KEYS: [&str; 18] = [
            "id",
            "task_id",
            "uuid",
            "_id",
            "title",
            "name",
            "status",
            "priority",
            "tags",
            "labels",
            "estimated_minutes",
            "estimate",
            "created_at",
            "createdAt",
            "updated_at",
            "updatedAt",
            "due_date",
            "dueDate",
        ];
        let extra: Map<String, Value> = obj
            .into_iter()
            .filter(|(k, _)| !KNOWN_KEYS.contains(&k.as_str()))
            .collect();

        Some(Self {
            id,
            title,
            status,
            priority,
            tags,
            estimated_minutes,
            created_at,
            updated_at,
            due_date,
            extra,
        })
    }
}

/// Treat JSON null, false, zero, empty strings, and empty containers as
/// absent when choosing between alternate field spellings
fn present(value: &Value) -> Option<&Value> {
    let absent = match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    };
    if absent { None } else { Some(value) }
}

fn string_like(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn priority_like(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                s.parse().ok()
            } else {
                match s.to_lowercase().as_str() {
                    "low" => Some(1),
                    "medium" => Some(2),
                    "high" => Some(3),
                    _ => None,
                }
            }
        }
        _ => None,
    }
}

fn tags_like(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(string_like)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn minutes_like(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                s.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}

fn timestamp_field(obj: &Map<String, Value>, snake: &str, camel: &str) -> Option<DateTime<Utc>> {
    obj.get(snake)
        .and_then(present)
        .or_else(|| obj.get(camel).and_then(present))
        .and_then(Value::as_str)
        .and_then(parse_datetime)
}
