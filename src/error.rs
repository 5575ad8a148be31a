//! Error type shared by the store, the task operations and the shell.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    /// A user-supplied due date is not `YYYY-MM-DD`.
    #[error("Invalid date format '{input}', expected YYYY-MM-DD")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// 1-based task number outside `1..=len`.
    #[error("Invalid task number {index} (there are {len} tasks)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Task number that is not a number at all.
    #[error("Invalid input '{0}', expected a task number")]
    InvalidInput(String),

    /// The store file exists but does not hold a task list.
    #[error("Task file {} is corrupt: {source}", path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read tasks from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to save tasks to {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode tasks: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, TaskError>;

impl TaskError {
    /// Errors raised while persisting, after the in-memory list already changed.
    pub fn is_save_failure(&self) -> bool {
        matches!(self, TaskError::Save { .. } | TaskError::Encode(_))
    }
}
