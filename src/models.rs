//! Domain models that mirror the `users` table and get passed throughout the
//! TUI. They stay plain data holders so the store and the UI can each focus on
//! their own job.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `users` table.
pub struct UserRecord {
    /// Primary key assigned by SQLite. Delete requests carry it back to the
    /// store.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    pub email: String,
    /// Raw `CURRENT_TIMESTAMP` text written by SQLite at insertion time.
    pub created_at: String,
}

impl fmt::Display for UserRecord {
    /// `{id} - {username}`, the label used by the deletion selector.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.id, self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Summary figures shown under the user table.
pub struct Metrics {
    pub total: usize,
    /// Username of the last record in id order. This is the tail of the list,
    /// not a `created_at` lookup.
    pub latest_username: String,
}

impl Metrics {
    /// Derive the metrics from records listed in ascending id order. Returns
    /// `None` for an empty slice since the statistics panel is hidden then.
    pub fn from_records(records: &[UserRecord]) -> Option<Self> {
        let last = records.last()?;
        Some(Self {
            total: records.len(),
            latest_username: last.username.clone(),
        })
    }
}
