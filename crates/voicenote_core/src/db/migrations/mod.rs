//! Schema steps for the `kv_store` slot table.
//!
//! # Responsibility
//! - Bring a connection from any older `user_version` up to the slot schema.
//! - Confirm the resulting table can serve keyed upserts.
//!
//! # Invariants
//! - Step versions start at 1 and increase by one.
//! - All pending steps commit together with the new `user_version`, or none do.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

/// One forward-only schema step.
#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "kv_store",
    sql: include_str!("0001_kv_store.sql"),
}];

/// Schema version written by the newest step in this build.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Runs every step newer than the connection's `user_version`, then checks
/// that `kv_store` is keyed the way slot writes expect.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `SlotSchemaMismatch` when `kv_store` lacks a primary key on `key`.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = schema_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    if from < latest {
        let tx = conn.transaction()?;
        for step in STEPS.iter().filter(|step| step.version > from) {
            tx.execute_batch(step.sql)?;
            tx.pragma_update(None, "user_version", step.version)?;
            debug!(
                "event=db_migrate_step module=db version={} name={}",
                step.version, step.name
            );
        }
        tx.commit()?;
        info!(
            "event=db_migrate module=db status=ok from_version={} to_version={}",
            from, latest
        );
    }

    verify_slot_table(conn)
}

/// Checks that `kv_store` has a `value` column and `key` as its sole
/// primary key.
pub fn verify_slot_table(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("SELECT name, pk FROM pragma_table_info('kv_store');")?;
    let columns = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    if columns.is_empty() {
        return Err(DbError::SlotSchemaMismatch("table is missing"));
    }
    if !columns.iter().any(|(name, _)| name == "value") {
        return Err(DbError::SlotSchemaMismatch("column `value` is missing"));
    }
    let keyed: Vec<&str> = columns
        .iter()
        .filter(|(_, pk)| *pk > 0)
        .map(|(name, _)| name.as_str())
        .collect();
    if keyed != ["key"] {
        return Err(DbError::SlotSchemaMismatch("`key` must be the only primary key"));
    }
    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}
