//! The task entity and its field types.
//!
//! A [`Task`] is one record in the ordered collection: identity, text
//! fields, priority/status enums, a due date, a display `order`, and
//! store-owned timestamps. JSON field names (`dueDate`, `createdAt`,
//! `updatedAt`, ...) are part of the storage and wire contract and must
//! survive round-trips verbatim.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a task, based on UUID v7 for time-ordering.
///
/// Ids are assigned once at creation and never reused, even after the
/// task is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Priority level of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Default urgency.
    Medium,
    /// Needs attention first.
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Not started yet.
    #[serde(rename = "pending")]
    Pending,
    /// Actively being worked on.
    #[serde(rename = "in-progress")]
    InProgress,
    /// Done.
    #[serde(rename = "completed")]
    Completed,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A single task record.
///
/// `order` defines the display position among all tasks; the store keeps
/// order values unique across the collection after every committed
/// operation. `created_at` and `updated_at` are set and refreshed only by
/// the store, never by callers, and `updated_at >= created_at` always
/// holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, never-reused identifier.
    pub id: TaskId,
    /// Short non-empty summary.
    pub title: String,
    /// Non-empty body text.
    pub description: String,
    /// Priority level.
    pub priority: Priority,
    /// Workflow status.
    pub status: Status,
    /// Due date, stored verbatim as the caller supplied it (RFC 3339
    /// timestamp or `YYYY-MM-DD` calendar date).
    pub due_date: String,
    /// Display position; unique across the collection.
    pub order: i64,
    /// When the store created this record.
    pub created_at: DateTime<Utc>,
    /// When the store last touched this record.
    pub updated_at: DateTime<Utc>,
}
