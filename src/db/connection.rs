use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, error};

use super::error::StoreError;

/// Handle to the on-disk SQLite file. It only remembers the path: every
/// operation opens its own connection and drops it before returning, so no
/// connection outlives a single store call.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the `users` table if it is missing. Safe to call on every start.
    pub fn initialize(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(err) = fs::create_dir_all(parent) {
                error!(path = %parent.display(), %err, "failed to create database directory");
            }
        }

        self.with_connection(|conn| {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username TEXT NOT NULL UNIQUE,
                    email TEXT NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )
            .map_err(StoreError::Schema)?;
            Ok(())
        })
        .inspect(|_| debug!(path = %self.path.display(), "users table ready"))
        .inspect_err(|err| error!(%err, "schema initialization failed"))
    }

    /// Open a connection, hand it to `op`, and close it when `op` returns. The
    /// connection is owned by this frame, so it is released on the error path
    /// and during unwinding as well.
    pub(crate) fn with_connection<T>(
        &self,
        op: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = Connection::open(&self.path).map_err(|source| StoreError::Connection {
            path: self.path.clone(),
            source,
        })?;
        op(&conn)
    }
}
