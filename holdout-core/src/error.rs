//! Error taxonomy for the survivor core.
//!
//! Nothing here is fatal: callers decide whether to retry, warn, or exit.

use thiserror::Error;

/// Rejected input. The operation that raised it changed nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("character name cannot be empty")]
    EmptyName,

    #[error("task title cannot be empty")]
    InvalidTitle,

    #[error("invalid item: {0}")]
    InvalidItem(String),

    #[error("invalid priority '{0}' (expected low, medium or high)")]
    InvalidPriority(String),
}

/// A purchase the market refused. Stats are untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("not enough XP: have {have}, need {need}")]
    InsufficientFunds { have: i64, need: i64 },

    #[error("{item} would have no effect right now")]
    NoEffect { item: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no task at index {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Failure while writing the save file. The previous file has already been
/// restored from backup when this is returned.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PersistenceError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
