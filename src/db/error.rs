use std::path::PathBuf;

use rusqlite::{Error as SqlError, ErrorCode};
use thiserror::Error;

/// Failures surfaced by the record store. None of these are fatal: the UI turns
/// each one into a message beside the control that triggered it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not open database at {}: {source}", .path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: SqlError,
    },

    #[error("failed to create users table: {0}")]
    Schema(#[source] SqlError),

    #[error("username '{username}' already exists")]
    UniqueConstraintViolation { username: String },

    #[error("failed to {action}: {source}")]
    Storage {
        action: &'static str,
        #[source]
        source: SqlError,
    },
}

impl StoreError {
    pub(crate) fn storage(action: &'static str) -> impl FnOnce(SqlError) -> Self {
        move |source| StoreError::Storage { action, source }
    }

    /// Map an insert failure, singling out SQLite's constraint code since the
    /// only constraint an insert can trip is the username uniqueness.
    pub(crate) fn from_insert(err: SqlError, username: &str) -> Self {
        if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
            StoreError::UniqueConstraintViolation {
                username: username.to_string(),
            }
        } else {
            StoreError::Storage {
                action: "insert user",
                source: err,
            }
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueConstraintViolation { .. })
    }
}
