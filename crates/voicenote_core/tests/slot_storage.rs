use rusqlite::Connection;
use voicenote_core::db::migrations::latest_version;
use voicenote_core::db::{open_db, open_db_in_memory, DbError};
use voicenote_core::{
    CorruptSlotPolicy, KeyValueStore, LogNotifier, NoteCollectionRepository, NoteStore,
    SqliteKeyValueStore, StorageError, DEFAULT_STORAGE_KEY,
};

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    SqliteKeyValueStore::try_new(&conn).unwrap();
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_database_with_unkeyed_slot_table_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unkeyed.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE kv_store (key TEXT NOT NULL, value TEXT NOT NULL);
         PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    assert!(matches!(
        open_db(&path).unwrap_err(),
        DbError::SlotSchemaMismatch(_)
    ));
}

#[test]
fn unmigrated_connection_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteKeyValueStore::try_new(&conn).err().unwrap();
    assert!(matches!(err, StorageError::MissingRequiredTable("kv_store")));
}

#[test]
fn sqlite_slot_replaces_value_and_removes_key() {
    let conn = open_db_in_memory().unwrap();
    let mut slot = SqliteKeyValueStore::try_new(&conn).unwrap();

    assert!(slot.get_item("k").unwrap().is_none());
    slot.set_item("k", "first").unwrap();
    slot.set_item("k", "second").unwrap();
    assert_eq!(slot.get_item("k").unwrap().as_deref(), Some("second"));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);

    slot.remove_item("k").unwrap();
    slot.remove_item("k").unwrap();
    assert!(slot.get_item("k").unwrap().is_none());
}

#[test]
fn notes_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("voicenote.db");

    let expected = {
        let conn = open_db(&path).unwrap();
        let repo = NoteCollectionRepository::new(SqliteKeyValueStore::try_new(&conn).unwrap());
        let mut store =
            NoteStore::initialize(repo, LogNotifier, CorruptSlotPolicy::Reset).unwrap();
        store.create("Hello").unwrap();
        store.create("World").unwrap();
        assert!(store.last_write_error().is_none());
        store.notes().to_vec()
    };

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let repo = NoteCollectionRepository::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    let store = NoteStore::initialize(repo, LogNotifier, CorruptSlotPolicy::Fail).unwrap();
    assert_eq!(store.notes(), expected.as_slice());
    assert_eq!(store.notes()[0].content, "World");
}

#[test]
fn slot_value_uses_browser_compatible_json_shape() {
    let conn = open_db_in_memory().unwrap();
    let repo = NoteCollectionRepository::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    let mut store = NoteStore::initialize(repo, LogNotifier, CorruptSlotPolicy::Reset).unwrap();
    let note = store.create("Buy Milk").unwrap();

    let raw = store
        .repository()
        .slot()
        .get_item(DEFAULT_STORAGE_KEY)
        .unwrap()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], note.id.to_string());
    assert_eq!(entries[0]["content"], "Buy Milk");
    assert!(entries[0]["date"].as_str().unwrap().contains('T'));
}
