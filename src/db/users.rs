use rusqlite::params;
use tracing::{debug, error, warn};

use super::connection::Store;
use super::error::StoreError;
use crate::models::UserRecord;

impl Store {
    /// Insert a user and return the id SQLite assigned. `created_at` comes from
    /// the column default.
    pub fn create(&self, username: &str, email: &str) -> Result<i64, StoreError> {
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO users (username, email) VALUES (?1, ?2)",
                params![username, email],
            )
            .map_err(|err| StoreError::from_insert(err, username))?;
            Ok(conn.last_insert_rowid())
        })
        .inspect(|id| debug!(id, username, "user created"))
        .inspect_err(|err| {
            if err.is_unique_violation() {
                warn!(username, "duplicate username rejected");
            } else {
                error!(%err, "user insert failed");
            }
        })
    }

    /// Every user in insertion order. An empty table yields an empty vector.
    pub fn list_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, username, email, created_at FROM users ORDER BY id")
                .map_err(StoreError::storage("prepare user query"))?;

            let users = stmt
                .query_map([], |row| {
                    Ok(UserRecord {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        email: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })
                .map_err(StoreError::storage("load users"))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(StoreError::storage("collect users"))?;

            Ok(users)
        })
        .inspect_err(|err| error!(%err, "listing users failed"))
    }

    /// Delete the user with `id`. No existence check is made: a missing id
    /// still reports `true`, only the affected row count in the log tells the
    /// two cases apart.
    pub fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        self.with_connection(|conn| {
            let deleted = conn
                .execute("DELETE FROM users WHERE id = ?1", params![id])
                .map_err(StoreError::storage("delete user"))?;
            debug!(id, deleted, "delete executed");
            Ok(true)
        })
        .inspect_err(|err| error!(%err, id, "user delete failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (Store, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("users.db"));
        store.initialize().unwrap();
        (store, dir)
    }

    #[test]
    fn created_at_is_filled_by_the_database() {
        let (store, _dir) = store();
        store.create("alice", "a@x.com").unwrap();
        let users = store.list_all().unwrap();
        assert_eq!(users[0].created_at.len(), "YYYY-MM-DD HH:MM:SS".len());
    }

    #[test]
    fn list_before_initialize_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path().join("fresh.db"));
        let err = store.list_all().unwrap_err();
        assert!(matches!(err, StoreError::Storage { .. }));
    }
}
