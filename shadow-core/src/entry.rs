//! Data model flowing through the parse -> match -> learn -> export pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// Sentinel task code for entries with no adequate match.
pub const UNMAPPED: &str = "UNMAPPED";

/// One time-range line from a shadow calendar, scoped to its date header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Date header exactly as written, e.g. `12 Jan, 2024`
    pub date: String,
    /// `HH:MM`
    pub start: String,
    /// `HH:MM`
    pub end: String,
    pub description: String,
}

impl TimeEntry {
    pub fn new(
        date: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            start: start.into(),
            end: end.into(),
            description: description.into(),
        }
    }
}

/// A time entry with the task code the matcher picked for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedEntry {
    #[serde(flatten)]
    pub entry: TimeEntry,
    pub task_code: String,
    /// 0.0 - 1.0
    pub confidence: f64,
}

impl MatchedEntry {
    pub fn new(entry: TimeEntry, task_code: impl Into<String>, confidence: f64) -> Self {
        Self {
            entry,
            task_code: task_code.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn unmapped(entry: TimeEntry) -> Self {
        Self::new(entry, UNMAPPED, 0.0)
    }

    pub fn is_unmapped(&self) -> bool {
        self.task_code == UNMAPPED
    }

    /// Mark this entry as resolved by a human answer.
    pub fn resolve(&mut self, task_code: impl Into<String>) {
        self.task_code = task_code.into();
        self.confidence = 1.0;
    }
}

/// A known description and its canonical task code.
///
/// The normalized form is derived at construction and cannot drift from the
/// description afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceRecord {
    description: String,
    normalized: String,
    task_code: String,
}

impl ReferenceRecord {
    pub fn new(description: impl Into<String>, task_code: impl Into<String>) -> Self {
        let description = description.into().trim().to_string();
        let normalized = normalize(&description);
        Self {
            description,
            normalized,
            task_code: task_code.into().trim().to_string(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn task_code(&self) -> &str {
        &self.task_code
    }
}

/// Exported row handed to the ERP-facing side.
///
/// Field names on the wire follow the ERP payload: `start_time`, `end_time`,
/// `task_description`, `erp_subtask`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub employee: String,
    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "task_description")]
    pub description: String,
    #[serde(rename = "erp_subtask")]
    pub task_code: String,
    pub confidence: f64,
}
