//! Versioned DDL for the read model, tracked in `PRAGMA user_version`.
//!
//! The external writer and this crate agree on the schema through the
//! version number alone; `projection_meta.schema_version` mirrors it so the
//! writer can read it without issuing pragmas.

use super::schema;
use rusqlite::{Connection, types::Type};

/// Highest schema version this crate knows how to create.
pub const LATEST_SCHEMA_VERSION: u32 = 2;

/// `(version, DDL)` steps, ascending.
const STEPS: &[(u32, &str)] = &[(1, schema::MIGRATION_V1_SQL), (2, schema::MIGRATION_V2_SQL)];

/// Schema version recorded in the database file (0 for a fresh file).
///
/// # Errors
///
/// Returns an error if the pragma cannot be read or holds a negative or
/// oversized value.
pub fn current_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let raw: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    u32::try_from(raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(err)))
}

/// Bring the schema up to [`LATEST_SCHEMA_VERSION`] and return the version
/// the database ends at.
///
/// Steps at or below the recorded version are skipped. Each remaining step
/// commits its DDL together with the version bump, so an interrupted run
/// resumes at the first unapplied step.
///
/// # Errors
///
/// Returns an error if a step fails; earlier steps stay committed.
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<u32> {
    let start = current_schema_version(conn)?;
    let mut reached = start;

    for &(version, ddl) in STEPS.iter().filter(|(version, _)| *version > start) {
        let tx = conn.transaction()?;
        tx.execute_batch(ddl)?;
        tx.pragma_update(None, "user_version", i64::from(version))?;
        tx.execute(
            "UPDATE projection_meta SET schema_version = ?1 WHERE id = 1",
            [i64::from(version)],
        )?;
        tx.commit()?;
        tracing::debug!(version, "applied read-model migration");
        reached = version;
    }

    Ok(reached)
}
