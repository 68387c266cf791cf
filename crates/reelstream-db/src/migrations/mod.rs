//! Catalog schema migrations.
//!
//! Schema steps are embedded SQL files applied in version order. The applied
//! version lives in SQLite's `user_version` header field, so an up-to-date
//! catalog needs no bookkeeping table.

use rusqlite::Connection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Schema step {version} ({name}) failed: {source}")]
    Step {
        version: u32,
        name: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Catalog schema version {found} is newer than this build supports ({supported})")]
    TooNew { found: u32, supported: u32 },
}

/// Schema steps as `(version, name, sql)`, oldest first.
const SCHEMA_STEPS: &[(u32, &str, &str)] = &[(1, "videos", include_str!("001_initial.sql"))];

fn schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

fn supported_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |(version, _, _)| *version)
}

/// Bring the catalog schema up to date, returning how many steps ran.
///
/// Each step and its version bump commit together, so an interrupted run
/// resumes at the failed step. A catalog written by a newer build is refused
/// rather than served with a schema this code does not know.
pub fn run_migrations(conn: &Connection) -> Result<usize, MigrationError> {
    let found = schema_version(conn)?;
    let supported = supported_version();
    if found > supported {
        return Err(MigrationError::TooNew { found, supported });
    }

    let mut applied = 0;
    for &(version, name, sql) in SCHEMA_STEPS.iter().filter(|(v, _, _)| *v > found) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)
            .and_then(|_| tx.pragma_update(None, "user_version", version))
            .map_err(|source| MigrationError::Step {
                version,
                name,
                source,
            })?;
        tx.commit()?;

        tracing::info!(version, name, "applied catalog schema step");
        applied += 1;
    }

    Ok(applied)
}
