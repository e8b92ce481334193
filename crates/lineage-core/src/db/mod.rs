//! SQLite read-model database utilities.
//!
//! Runtime defaults:
//! - `journal_mode = WAL` so queries can read while the writer appends
//! - `busy_timeout = 5s` to ride out transient writer locks
//! - `foreign_keys = ON` to keep family-child links attached to families

pub mod migrations;
pub mod query;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::{path::Path, time::Duration};

use crate::error::{ErrorCode, is_corrupt_projection};

/// Busy timeout used for read-model DB connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (or create) the read-model SQLite database, apply runtime pragmas,
/// and migrate schema to the latest version.
///
/// # Errors
///
/// Returns an error if opening/configuring/migrating the database fails.
pub fn open_projection(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create read-model db directory {}", parent.display()))?;
    }

    let mut conn = Connection::open(path)
        .with_context(|| format!("open read-model database {}", path.display()))?;

    configure_connection(&conn).context("configure sqlite pragmas")?;
    migrations::migrate(&mut conn).context("apply read-model migrations")?;

    Ok(conn)
}

/// Attempt to open the read-model database without failing hard.
///
/// Returns `Ok(None)` when the file is missing or unreadable so the caller
/// can ask the writer to repopulate it.
///
/// # Errors
///
/// Currently infallible; the `Result` leaves room for unexpected I/O errors.
pub fn try_open_projection(path: &Path) -> Result<Option<Connection>> {
    if !path.exists() {
        return Ok(None);
    }

    let opened = open_projection(path)
        .and_then(|conn| query::get_projection_cursor(&conn).map(|_| conn));
    match opened {
        Ok(conn) => Ok(Some(conn)),
        Err(e) => {
            let code = projection_error_code(&e);
            tracing::warn!(
                path = %path.display(),
                code = code.code(),
                error = %format!("{e:#}"),
                "read-model database unusable, needs repopulating"
            );
            Ok(None)
        }
    }
}

/// Classify a failure to open or read the projection.
#[must_use]
pub fn projection_error_code(err: &anyhow::Error) -> ErrorCode {
    if is_corrupt_projection(err) {
        ErrorCode::CorruptProjection
    } else {
        ErrorCode::StoreFailure
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}
