//! Normalization of analysis-service rows into [`FeedbackRecord`]s
//!
//! The analysis service emits loosely-typed rows with its own vocabulary
//! (`pending`, `in-progress`, `pricing`, ...). Everything is coerced here, once,
//! so the store and the aggregation engine only ever see fully-populated
//! records.

use super::model::{Category, FeedbackRecord, Impact, Status, Urgency};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Summary length when falling back to the description
const SUMMARY_FALLBACK_CHARS: usize = 150;

/// A feedback row as produced by the analysis service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFeedback {
    pub id: Option<Value>,
    pub category: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub full_text: Option<String>,
    pub root_cause: Option<String>,
    pub full_category: Option<String>,
    pub urgency: Option<String>,
    pub impact: Option<String>,
    pub status: Option<String>,
    pub date: Option<Value>,
}

/// Outcome of normalizing one payload
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<FeedbackRecord>,
    /// Rows dropped because no summary could be derived
    pub skipped: usize,
}

pub fn normalize_category(value: Option<&str>) -> Category {
    value
        .and_then(|v| v.parse().ok())
        .unwrap_or(Category::Other)
}

pub fn normalize_urgency(value: Option<&str>) -> Urgency {
    value.and_then(|v| v.parse().ok()).unwrap_or(Urgency::Medium)
}

pub fn normalize_impact(value: Option<&str>) -> Impact {
    value.and_then(|v| v.parse().ok()).unwrap_or(Impact::Medium)
}

pub fn normalize_status(value: Option<&str>) -> Status {
    let Some(value) = value else {
        return Status::NotStarted;
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "completed" | "done" => Status::Completed,
        "ongoing" | "in-progress" | "in_progress" => Status::Ongoing,
        _ => Status::NotStarted,
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

impl RawFeedback {
    /// Coerce this row into a record; `None` when no summary can be derived
    pub fn into_record(self, fallback_id: impl FnOnce() -> String) -> Option<FeedbackRecord> {
        let description = non_blank(self.description.as_ref()).or_else(|| non_blank(self.full_text.as_ref()));

        let summary = non_blank(self.summary.as_ref()).or_else(|| {
            description
                .as_deref()
                .map(|d| truncate_chars(d, SUMMARY_FALLBACK_CHARS))
        })?;

        let id = self
            .id
            .as_ref()
            .and_then(value_to_string)
            .unwrap_or_else(fallback_id);

        Some(FeedbackRecord {
            id,
            category: normalize_category(self.category.as_deref()),
            summary,
            description,
            urgency: normalize_urgency(self.urgency.as_deref()),
            impact: normalize_impact(self.impact.as_deref()),
            status: normalize_status(self.status.as_deref()),
            date: self.date.as_ref().and_then(value_to_string),
        })
    }
}

/// Normalize a whole payload, enforcing id uniqueness
///
/// `timestamp` seeds generated ids (`FB{timestamp}{row:03}`, rows numbered
/// from 1). A repeated id gets a `-{n}` suffix.
pub fn normalize_all(rows: Vec<RawFeedback>, timestamp: i64) -> Normalized {
    let mut out = Normalized::default();
    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());

    for (i, row) in rows.into_iter().enumerate() {
        let Some(mut record) = row.into_record(|| format!("FB{}{:03}", timestamp, i + 1)) else {
            out.skipped += 1;
            continue;
        };

        if seen.contains(&record.id) {
            let base = record.id.clone();
            let mut n = 2;
            while seen.contains(&format!("{}-{}", base, n)) {
                n += 1;
            }
            record.id = format!("{}-{}", base, n);
            tracing::debug!("Renamed duplicate feedback id {} to {}", base, record.id);
        }

        seen.insert(record.id.clone());
        out.records.push(record);
    }

    out
}
