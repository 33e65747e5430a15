//! SQLite home of the durable note slot.
//!
//! # Responsibility
//! - Hand out connections whose `kv_store` table is ready for slot I/O.
//! - Report why a database file cannot host the slot.
//!
//! # Invariants
//! - `kv_store` holds at most one row per key (`key` is the primary key).
//! - A slot write is one `INSERT .. ON CONFLICT(key) DO UPDATE` statement,
//!   so readers see either the previous or the next collection, never a mix.
//! - The schema revision lives in `PRAGMA user_version`; a file written by a
//!   newer build is refused instead of being migrated backwards.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening or preparing the slot database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// File was migrated by a newer build of this crate.
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
    /// `kv_store` exists but cannot back single-statement upserts.
    SlotSchemaMismatch(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "note database has schema version {db_version}; this build reads up to {latest_supported}"
            ),
            Self::SlotSchemaMismatch(reason) => write!(f, "kv_store table is unusable: {reason}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
