//! Input payloads accepted at the API boundary.
//!
//! [`NewTask`] carries every caller-settable field and is required in
//! full; [`TaskPatch`] is the same set with every field optional. Both
//! reject unknown JSON fields, so a payload trying to set `id`, `order`,
//! or a timestamp fails deserialization instead of being silently
//! ignored.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use crate::error::ValidationError;
use crate::task::{Priority, Status};

/// Payload for creating a task. The store assigns `id`, `order`, and
/// both timestamps.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewTask {
    /// Short non-empty summary.
    pub title: String,
    /// Non-empty body text.
    pub description: String,
    /// Priority level.
    pub priority: Priority,
    /// Workflow status.
    pub status: Status,
    /// Due date as an RFC 3339 timestamp or a `YYYY-MM-DD` date.
    pub due_date: String,
}

impl NewTask {
    /// Checks every field against the creation constraints.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`ValidationError`]; the caller must not
    /// mutate anything on failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::TitleEmpty);
        }
        if self.description.is_empty() {
            return Err(ValidationError::DescriptionEmpty);
        }
        validate_due_date(&self.due_date)
    }
}

/// Partial update for an existing task. Absent fields are left
/// unchanged; present fields must satisfy the same rules as in
/// [`NewTask`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement priority.
    pub priority: Option<Priority>,
    /// Replacement status.
    pub status: Option<Status>,
    /// Replacement due date.
    pub due_date: Option<String>,
}

impl TaskPatch {
    /// Returns true when the patch carries no field at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
    }

    /// Checks every provided field against the creation constraints.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.as_deref().is_some_and(str::is_empty) {
            return Err(ValidationError::TitleEmpty);
        }
        if self.description.as_deref().is_some_and(str::is_empty) {
            return Err(ValidationError::DescriptionEmpty);
        }
        if let Some(due_date) = self.due_date.as_deref() {
            validate_due_date(due_date)?;
        }
        Ok(())
    }
}

/// Accepts an RFC 3339 timestamp or a plain `YYYY-MM-DD` calendar date.
fn validate_due_date(value: &str) -> Result<(), ValidationError> {
    if DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
    {
        Ok(())
    } else {
        Err(ValidationError::InvalidDueDate(value.to_string()))
    }
}
