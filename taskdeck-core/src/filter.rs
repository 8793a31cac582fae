//! Compound read filter: title substring, status, and priority.
//!
//! Every predicate is optional and independently omitted; the filter is
//! the conjunction of whatever is present. An absent predicate matches
//! every task.

use serde::Deserialize;

use crate::task::{Priority, Status, Task};

/// Optional conjunction of predicates applied by list reads.
///
/// Deserializes directly from query strings, so `?title=doc&status=pending`
/// produces a filter with two predicates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    /// Case-insensitive substring to look for in titles. A blank value is
    /// treated as absent.
    pub title: Option<String>,
    /// Exact status to match.
    pub status: Option<Status>,
    /// Exact priority to match.
    pub priority: Option<Priority>,
}

impl TaskFilter {
    /// Returns true when no predicate is present, i.e. the filter matches
    /// every task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title_needle().is_none() && self.status.is_none() && self.priority.is_none()
    }

    /// Whether the task satisfies every present predicate.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.title_needle()
            .is_none_or(|needle| task.title.to_lowercase().contains(&needle.to_lowercase()))
            && self.status.is_none_or(|status| task.status == status)
            && self
                .priority
                .is_none_or(|priority| task.priority == priority)
    }

    /// The title predicate, with blank queries normalized away.
    fn title_needle(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
    }
}
