//! Mood-file mode resolution
//!
//! A small heuristic bridge from journaling output to a planning mode.
//! Well-known JSON files are probed in priority order and the first one
//! yielding a readable signal wins; otherwise the preferred or default
//! mode applies.

use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::domain::Mode;

/// Mood files probed under the mood directory, highest priority first
pub const MOOD_FILE_CANDIDATES: [&str; 4] = [
    "today_mood.json",
    "today_summary.json",
    "daily_mood.json",
    "mood_today.json",
];

/// A resolved mode plus where it came from, for logs and rendered output
#[derive(Debug, Clone, PartialEq)]
pub struct ModeResolution {
    pub mode: Mode,
    /// Path of the winning mood file, or "fallback"
    pub source: String,
    pub reason: String,
}

fn read_json(path: &Path) -> Option<Value> {
    let text = fs::read_to_string(path).ok()?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    serde_json::from_str(text).ok()
}

fn scalar_lower(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.to_lowercase(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn infer_mode(payload: &Value) -> Option<Mode> {
    // list payloads carry a history of entries, only the last one counts
    let payload = match payload {
        Value::Array(items) => items.last()?,
        other => other,
    };
    let map = payload.as_object()?;

    for key in ["mode", "today_mode", "recommended_mode", "plan_mode"] {
        if let Some(value) = map.get(key).and_then(Value::as_str) {
            if let Ok(mode) = value.parse() {
                return Some(mode);
            }
        }
    }

    let dominant = scalar_lower(map.get("dominant_mood"));
    let energy = scalar_lower(map.get("energy"));
    let stress = scalar_lower(map.get("stress"));

    let tired = ["tired", "exhausted", "sad", "low", "burnout"];
    let high_energy = ["excited", "motivated", "high", "hyper", "flow"];

    // exhaustion signals outrank excitement when both are present
    if tired.contains(&dominant.as_str())
        || energy == "low"
        || matches!(stress.as_str(), "high" | "very high")
    {
        return Some(Mode::Rest);
    }
    if high_energy.contains(&dominant.as_str()) || energy == "high" {
        return Some(Mode::Focus);
    }

    if let Some(hint) = map.get("mode_hint").and_then(Value::as_str) {
        if let Ok(mode) = hint.parse() {
            return Some(mode);
        }
    }

    None
}

/// Resolve today's mode from mood files under `mood_dir`
///
/// Candidates are probed in [`MOOD_FILE_CANDIDATES`] order; unreadable,
/// empty, or uninformative files are skipped. When nothing yields a
/// signal the preferred mode applies, defaulting to balance.
pub fn resolve_mode(mood_dir: &Path, preferred: Option<&str>) -> ModeResolution {
    for name in MOOD_FILE_CANDIDATES {
        let path = mood_dir.join(name);
        if !path.exists() {
            continue;
        }

        let Some(payload) = read_json(&path) else {
            debug!(?path, "resolve_mode: unreadable mood file, skipping");
            continue;
        };

        if let Some(mode) = infer_mode(&payload) {
            debug!(?path, %mode, "resolve_mode: inferred from mood file");
            return ModeResolution {
                mode,
                source: path.display().to_string(),
                reason: "inferred from JSON content".to_string(),
            };
        }
    }

    let mode = preferred.and_then(|p| p.parse().ok()).unwrap_or_default();
    let reason = match preferred {
        None => "no mood files found, fallback to default".to_string(),
        Some(p) => format!("no mood files found, fallback to preferred_mode={:?}", p),
    };
    debug!(%mode, reason, "resolve_mode: fallback");
    ModeResolution {
        mode,
        source: "fallback".to_string(),
        reason,
    }
}
