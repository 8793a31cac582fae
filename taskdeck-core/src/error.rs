//! Validation errors for task input payloads.

use thiserror::Error;

/// Errors raised while validating a create or update payload.
///
/// Validation runs before any mutation, so a failed payload leaves the
/// store untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Task title cannot be empty.
    #[error("task title cannot be empty")]
    TitleEmpty,
    /// Task description cannot be empty.
    #[error("task description cannot be empty")]
    DescriptionEmpty,
    /// Due date is not a parseable calendar date or timestamp.
    #[error("invalid due date: {0:?}")]
    InvalidDueDate(String),
}
