//! Durable JSON-file storage for the task collection.
//!
//! The whole collection is one JSON array of task objects at a fixed
//! path. `load` tolerates a missing file (an empty store); `save` writes
//! the full array to a temporary sibling file and renames it into place,
//! so a failed write never truncates the previous durable state.

use std::path::{Path, PathBuf};

use taskdeck_core::Task;

/// Errors that can occur while loading or saving the task file.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Failed to read the task file.
    #[error("failed to read task file {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write the task file.
    #[error("failed to write task file {path}: {source}")]
    Write {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The task file does not contain a valid JSON task array.
    #[error("malformed task file: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// JSON-file storage medium keyed by a fixed path.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    /// Creates a storage handle for the given file path. Nothing is read
    /// or written until [`load`](Self::load) or [`save`](Self::save).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path this storage reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full task collection. A missing file yields an empty
    /// collection.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file exists but cannot be read or
    /// does not parse as a JSON task array.
    pub fn load(&self) -> Result<Vec<Task>, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        Ok(serde_json::from_str(&contents)?)
    }

    /// Persists the full task collection, replacing the previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the parent directory cannot be created
    /// or the write/rename fails. On failure the previously saved state is
    /// left intact.
    pub fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Write {
                path: self.path.clone(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(tasks)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json).map_err(|e| StorageError::Write {
            path: tmp_path.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::Write {
            path: self.path.clone(),
            source: e,
        })
    }
}
