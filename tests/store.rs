use tempfile::TempDir;
use user_registry::{Metrics, Store, StoreError};

// Each test gets its own database file inside a temporary directory.
fn create_temp_store() -> (Store, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("database.db"));
    store.initialize().unwrap();
    (store, dir)
}

#[test]
fn fresh_store_lists_nothing() {
    let (store, _dir) = create_temp_store();
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn initialize_is_idempotent_and_keeps_rows() {
    let (store, _dir) = create_temp_store();
    store.create("alice", "a@x.com").unwrap();
    store.initialize().unwrap();
    store.initialize().unwrap();
    assert_eq!(store.list_all().unwrap().len(), 1);
}

#[test]
fn initialize_creates_missing_directories() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path().join("nested").join("deeper").join("users.db"));
    store.initialize().unwrap();
    assert!(store.path().exists());
}

#[test]
fn create_adds_exactly_one_record_with_ascending_id() {
    let (store, _dir) = create_temp_store();
    let first = store.create("alice", "a@x.com").unwrap();
    let before = store.list_all().unwrap();

    let second = store.create("bob", "b@x.com").unwrap();
    let after = store.list_all().unwrap();

    assert!(second > first);
    assert_eq!(after.len(), before.len() + 1);
    let added = after.last().unwrap();
    assert_eq!(added.id, second);
    assert_eq!(added.username, "bob");
    assert_eq!(added.email, "b@x.com");
}

#[test]
fn duplicate_username_is_rejected_and_store_unchanged() {
    let (store, _dir) = create_temp_store();
    store.create("alice", "a@x.com").unwrap();

    let err = store.create("alice", "other@x.com").unwrap_err();
    assert!(matches!(
        err,
        StoreError::UniqueConstraintViolation { ref username } if username == "alice"
    ));

    let users = store.list_all().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "a@x.com");
}

#[test]
fn duplicate_email_is_allowed() {
    let (store, _dir) = create_temp_store();
    store.create("alice", "shared@x.com").unwrap();
    store.create("bob", "shared@x.com").unwrap();
    assert_eq!(store.list_all().unwrap().len(), 2);
}

#[test]
fn delete_removes_only_the_target() {
    let (store, _dir) = create_temp_store();
    let alice = store.create("alice", "a@x.com").unwrap();
    let bob = store.create("bob", "b@x.com").unwrap();
    let carol = store.create("carol", "c@x.com").unwrap();

    assert!(store.delete_by_id(bob).unwrap());

    let ids: Vec<i64> = store.list_all().unwrap().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![alice, carol]);
}

#[test]
fn deleting_missing_id_reports_success_and_changes_nothing() {
    let (store, _dir) = create_temp_store();
    store.create("alice", "a@x.com").unwrap();
    let before = store.list_all().unwrap();

    assert!(store.delete_by_id(999).unwrap());
    assert_eq!(store.list_all().unwrap(), before);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let (store, _dir) = create_temp_store();
    let first = store.create("alice", "a@x.com").unwrap();
    let second = store.create("bob", "b@x.com").unwrap();
    store.delete_by_id(second).unwrap();

    let third = store.create("carol", "c@x.com").unwrap();
    assert!(third > second && second > first);
}

#[test]
fn unreachable_database_is_a_connection_error() {
    let dir = TempDir::new().unwrap();
    // Without initialize() nothing creates the parent directory.
    let store = Store::new(dir.path().join("missing").join("users.db"));
    let err = store.list_all().unwrap_err();
    assert!(matches!(err, StoreError::Connection { .. }));
}

#[test]
fn non_database_file_is_a_schema_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.db");
    // Opening is lazy; the header is only read when the table is created.
    std::fs::write(&path, vec![0x5a_u8; 4096]).unwrap();

    let err = Store::new(path).initialize().unwrap_err();
    assert!(matches!(err, StoreError::Schema(_)), "{err:?}");
}

#[test]
fn store_level_scenario() {
    let (store, _dir) = create_temp_store();
    store.create("alice", "a@x.com").unwrap();
    store.create("bob", "b@x.com").unwrap();

    let users = store.list_all().unwrap();
    assert_eq!(
        users.iter().map(|u| (u.id, u.username.as_str())).collect::<Vec<_>>(),
        vec![(1, "alice"), (2, "bob")]
    );
    let metrics = Metrics::from_records(&users).unwrap();
    assert_eq!((metrics.total, metrics.latest_username.as_str()), (2, "bob"));

    store.delete_by_id(1).unwrap();
    let users = store.list_all().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!((users[0].id, users[0].username.as_str()), (2, "bob"));
    let metrics = Metrics::from_records(&users).unwrap();
    assert_eq!((metrics.total, metrics.latest_username.as_str()), (1, "bob"));
}
