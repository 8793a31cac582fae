//! The ordered task store.
//!
//! A single owned collection of tasks with filtered reads and
//! order-mutating writes, flushed to [`JsonStorage`] after every
//! mutation. The store has no internal locking: the server wraps it in a
//! `tokio::sync::RwLock` so each mutating call runs its whole
//! compute-then-persist unit without interleaving.
//!
//! Collection invariant: `tasks` is always sorted ascending by `order`.
//! Loading sorts, `create` appends with `max + 1`, `remove` preserves
//! relative order, and `reorder` re-sorts before returning.

use chrono::Utc;
use taskdeck_core::{NewTask, Task, TaskFilter, TaskId, TaskPatch, ValidationError};

use crate::storage::{JsonStorage, StorageError};

/// Errors returned by store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No task has the given id.
    #[error("task with id {0} not found")]
    NotFound(TaskId),

    /// An input payload failed validation; the store was not touched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The durable write failed after the in-memory mutation was applied.
    /// Memory is ahead of disk until the next successful save.
    #[error("failed to persist tasks: {0}")]
    Persistence(#[from] StorageError),
}

/// Serializable, ordered collection of task records backed by a JSON
/// file.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    storage: JsonStorage,
}

impl TaskStore {
    /// Opens the store, loading whatever the storage currently holds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] if the task file exists but
    /// cannot be read or parsed.
    pub fn open(storage: JsonStorage) -> Result<Self, StoreError> {
        let mut tasks = storage.load()?;
        tasks.sort_by_key(|task| task.order);
        Ok(Self { tasks, storage })
    }

    /// Number of tasks currently in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Creates a task from a validated input payload.
    ///
    /// Assigns a fresh id, `order = max existing order (or -1) + 1`, and
    /// identical `created_at`/`updated_at` timestamps, then persists the
    /// full collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] before any mutation, or
    /// [`StoreError::Persistence`] if the durable write fails after the
    /// task was added in memory.
    pub fn create(&mut self, input: NewTask) -> Result<Task, StoreError> {
        input.validate()?;

        let now = Utc::now();
        let order = self.tasks.iter().map(|t| t.order).max().unwrap_or(-1) + 1;
        let task = Task {
            id: TaskId::new(),
            title: input.title,
            description: input.description,
            priority: input.priority,
            status: input.status,
            due_date: input.due_date,
            order,
            created_at: now,
            updated_at: now,
        };

        // New order exceeds every existing one, so appending keeps the
        // collection sorted.
        self.tasks.push(task.clone());
        tracing::debug!(id = %task.id, order, "task created");
        self.persist()?;
        Ok(task)
    }

    /// Returns the tasks matching the filter, ascending by `order`.
    ///
    /// An empty filter returns the whole collection. Never mutates.
    #[must_use]
    pub fn find_all(&self, filter: &TaskFilter) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect()
    }

    /// Returns the task with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task has that id.
    pub fn find_one(&self, id: TaskId) -> Result<&Task, StoreError> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Merges a patch into the stored task and refreshes `updated_at`.
    ///
    /// `id`, `order`, and `created_at` are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] or [`StoreError::NotFound`]
    /// before any mutation, or [`StoreError::Persistence`] if the durable
    /// write fails afterwards.
    pub fn update(&mut self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        patch.validate()?;

        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))?;

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        task.updated_at = Utc::now();

        let updated = task.clone();
        tracing::debug!(id = %id, "task updated");
        self.persist()?;
        Ok(updated)
    }

    /// Deletes the task with the given id.
    ///
    /// Remaining tasks keep their `order` values; gaps left by deletion
    /// are not compacted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] before any mutation, or
    /// [`StoreError::Persistence`] if the durable write fails afterwards.
    pub fn remove(&mut self, id: TaskId) -> Result<(), StoreError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))?;
        self.tasks.remove(index);
        tracing::debug!(id = %id, "task removed");
        self.persist()
    }

    /// Rewrites display positions: position `i` in `task_ids` becomes
    /// `order = i`.
    ///
    /// The whole id set is validated before any record is touched, so a
    /// missing id leaves every task exactly as it was. Tasks omitted from
    /// `task_ids` keep their previous `order` values, which can collide
    /// with the newly assigned ones; callers are expected to send the
    /// complete ordering.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] with the first unknown id, or
    /// [`StoreError::Persistence`] if the durable write fails after the
    /// new ordering was applied in memory.
    pub fn reorder(&mut self, task_ids: &[TaskId]) -> Result<Vec<Task>, StoreError> {
        // Phase one: validate the full id set up front.
        for id in task_ids {
            if !self.tasks.iter().any(|task| task.id == *id) {
                return Err(StoreError::NotFound(*id));
            }
        }

        // Phase two: apply every assignment, then restore the sort
        // invariant.
        let now = Utc::now();
        for (position, id) in task_ids.iter().enumerate() {
            if let Some(task) = self.tasks.iter_mut().find(|task| task.id == *id) {
                task.order = i64::try_from(position).unwrap_or(i64::MAX);
                task.updated_at = now;
            }
        }
        self.tasks.sort_by_key(|task| task.order);

        tracing::debug!(count = task_ids.len(), "tasks reordered");
        self.persist()?;
        Ok(self.tasks.clone())
    }

    /// Flushes the full collection to storage, surfacing failures to the
    /// caller instead of swallowing them.
    fn persist(&self) -> Result<(), StoreError> {
        self.storage.save(&self.tasks).map_err(|e| {
            tracing::warn!(
                path = %self.storage.path().display(),
                error = %e,
                "persist failed; in-memory state is ahead of disk"
            );
            StoreError::Persistence(e)
        })
    }
}
