//! Domain model for Taskdeck.
//!
//! Defines the task entity with its ordered-collection invariants, the
//! input payloads accepted at the API boundary, and the compound filter
//! applied to reads. Serialization uses the JSON field names of the wire
//! and storage format verbatim.

pub mod error;
pub mod filter;
pub mod input;
pub mod task;

pub use error::ValidationError;
pub use filter::TaskFilter;
pub use input::{NewTask, TaskPatch};
pub use task::{Priority, Status, Task, TaskId};
