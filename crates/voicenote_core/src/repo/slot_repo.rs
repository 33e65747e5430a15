//! Durable key-value slot contracts and implementations.
//!
//! # Responsibility
//! - Model the single named storage slot the note collection lives in.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `set_item` replaces the whole value for a key in one statement; readers
//!   never observe a partially written value.
//! - Missing keys read as `None`, never as an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-layer error for slot access and collection decoding.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Slot content could not be decoded into a note collection.
    Parse(String),
    /// Note collection could not be encoded.
    Encode(String),
    /// Backend refused the operation.
    Unavailable(String),
    /// Connection is missing the slot table.
    MissingRequiredTable(&'static str),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Parse(message) => write!(f, "invalid stored note collection: {message}"),
            Self::Encode(message) => write!(f, "failed to encode note collection: {message}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "storage connection missing required table `{table}`")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String key-value storage, shaped after browser local storage.
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Replaces the value stored under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Removes `key`; removing an absent key is not an error.
    fn remove_item(&mut self, key: &str) -> StorageResult<()>;
}

/// SQLite-backed slot storage over the `kv_store` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Constructs a store from a migrated connection.
    ///
    /// Rejects connections where migrations have not created `kv_store`.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'kv_store'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(StorageError::MissingRequiredTable("kv_store"));
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// In-process slot storage.
///
/// Counts successful writes and can be switched into a failing mode, which
/// lets callers observe persistence outcomes without a database.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    items: HashMap<String, String>,
    write_count: usize,
    fail_writes: bool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one key.
    pub fn with_item(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut store = Self::default();
        store.items.insert(key.into(), value.into());
        store
    }

    /// Makes subsequent `set_item`/`remove_item` calls fail.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful `set_item` calls.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    fn check_writable(&self) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::Unavailable(
                "memory store is rejecting writes".to_string(),
            ));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.check_writable()?;
        self.items.insert(key.to_string(), value.to_string());
        self.write_count += 1;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.check_writable()?;
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryKeyValueStore, StorageError};

    #[test]
    fn memory_store_counts_writes_and_can_fail() {
        let mut store = MemoryKeyValueStore::new();
        store.set_item("k", "v1").unwrap();
        store.set_item("k", "v2").unwrap();
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v2"));

        store.set_fail_writes(true);
        let err = store.set_item("k", "v3").unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn memory_store_remove_of_absent_key_is_ok() {
        let mut store = MemoryKeyValueStore::new();
        store.remove_item("missing").unwrap();
        assert!(store.get_item("missing").unwrap().is_none());
    }
}
