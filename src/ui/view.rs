//! Per-render context. A `Snapshot` is read from the store after every
//! interaction and handed to the draw and key handlers explicitly; nothing
//! keeps record data between interactions.

use crate::db::Store;
use crate::models::{Metrics, UserRecord};

#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    pub records: Vec<UserRecord>,
    /// `None` whenever `records` is empty.
    pub metrics: Option<Metrics>,
    /// Message from a failed `list_all`. The snapshot is empty in that case.
    pub load_error: Option<String>,
}

impl Snapshot {
    /// Read the current record set. A failed read is kept as a message so the
    /// screen can show it instead of aborting.
    pub fn load(store: &Store) -> Self {
        match store.list_all() {
            Ok(records) => Self::from_records(records),
            Err(err) => Self {
                load_error: Some(format!("Error while loading users: {err}")),
                ..Self::default()
            },
        }
    }

    pub fn from_records(records: Vec<UserRecord>) -> Self {
        let metrics = Metrics::from_records(&records);
        Self {
            records,
            metrics,
            load_error: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `index`, clamped to the last row so a selection survives
    /// deletions at the end of the list.
    pub(crate) fn clamped(&self, index: usize) -> Option<(usize, &UserRecord)> {
        let last = self.records.len().checked_sub(1)?;
        let index = index.min(last);
        self.records.get(index).map(|record| (index, record))
    }
}
