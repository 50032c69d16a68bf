//! Task entity and form inputs.
//!
//! Tasks live in a document store keyed by generated id; this module holds
//! the stable domain shape produced by repository reads, the form-side
//! inputs (drafts and patches), and the due-date helpers.

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum title length, enforced at the form boundary (not at storage).
pub const TITLE_MAX_CHARS: usize = 100;

const DISPLAY_DATE_FORMAT: &str = "%b %d, %Y";

/// Task status. New tasks are always `Open`; user action toggles between
/// the two states and nothing else.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Open,
    Complete,
}

impl TaskStatus {
    /// The status a toggle writes: Open becomes Complete and back.
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Open => TaskStatus::Complete,
            TaskStatus::Complete => TaskStatus::Open,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Open => "Open",
            TaskStatus::Complete => "Complete",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task as read through the repository.
///
/// `created_at`/`updated_at` are materialized ISO-8601 strings regardless of
/// the store's native timestamp representation; `id` and `user_id` are
/// immutable for the task's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub status: TaskStatus,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    /// An open task whose due date has passed, at day granularity.
    pub fn is_overdue(&self) -> bool {
        self.status == TaskStatus::Open && self.due_date.date_naive() < Utc::now().date_naive()
    }
}

/// Validated payload for `create_task`. Built via [`TaskDraft::validate`];
/// status and ownership are supplied by the repository, timestamps by the
/// store.
#[derive(Debug, Clone)]
pub struct NewTaskInput {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
}

/// Partial update for `update_task` / store merge. `None` fields are left
/// untouched; `updated_at` is refreshed by the store on every merge.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }
}

/// Unvalidated form input for the add/edit task editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Empty draft for a new task; the due date defaults to today.
    pub fn for_new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due_date: Some(Utc::now().date_naive()),
        }
    }

    /// Draft prefilled from an existing task for editing.
    pub fn for_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: Some(task.due_date.date_naive()),
        }
    }

    /// Validate the draft and produce a create/update payload.
    ///
    /// This is the only place title/due-date rules are enforced; validation
    /// failures never reach the store.
    pub fn validate(&self) -> Result<NewTaskInput> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("Title is required".to_string()));
        }
        if title.chars().count() > TITLE_MAX_CHARS {
            return Err(Error::InvalidInput(
                "Title cannot exceed 100 characters".to_string(),
            ));
        }
        let due_date = self
            .due_date
            .ok_or_else(|| Error::InvalidInput("Due date is required".to_string()))?;
        let due_date = due_date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| Error::InvalidInput("Due date is required".to_string()))?
            .and_utc();
        Ok(NewTaskInput {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            due_date,
        })
    }
}

/// Render a timestamp in the canonical read shape: ISO-8601 with
/// millisecond precision and a `Z` suffix.
pub fn iso_string(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 instant or bare calendar date down to its day.
fn parse_day(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.with_timezone(&Utc).date_naive());
    }
    trimmed.parse::<NaiveDate>().ok()
}

/// Whether a due date string has passed, compared at day granularity
/// against the given "today". Unparseable input is never overdue.
pub fn is_overdue_on(due_date: &str, today: NaiveDate) -> bool {
    match parse_day(due_date) {
        Some(due) => due < today,
        None => false,
    }
}

/// `is_overdue_on` against the current UTC day.
pub fn is_overdue(due_date: &str) -> bool {
    is_overdue_on(due_date, Utc::now().date_naive())
}

/// Format a date string for display as e.g. "Jan 01, 2025".
///
/// Empty input renders as the empty string, unparseable input as
/// "Invalid date".
pub fn format_date(value: &str) -> String {
    if value.trim().is_empty() {
        return String::new();
    }
    match parse_day(value) {
        Some(day) => day.format(DISPLAY_DATE_FORMAT).to_string(),
        None => "Invalid date".to_string(),
    }
}
