//! Database connection pool management.
//!
//! This module provides connection pooling for SQLite using r2d2.
//! It handles pool initialization, connection customization, and running migrations.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use reelstream_common::{Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Pool size used when the caller has no configured value.
pub const DEFAULT_POOL_SIZE: u32 = 4;

static MEMORY_DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Initialize a new database pool with the given file path.
///
/// This function will:
/// - Create the SQLite database file if it doesn't exist
/// - Set up connection pooling with r2d2, capped at `max_size` connections
/// - Enable WAL journaling and a busy timeout on every connection
/// - Run pending database migrations
///
/// # Example
///
/// ```no_run
/// use reelstream_db::pool::init_pool;
///
/// let pool = init_pool("/var/lib/reelstream/catalog.db", 4).unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_pool(db_path: &str, max_size: u32) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch("PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;")
    });

    build_pool(manager, max_size)
}

/// Initialize an in-memory database pool for testing.
///
/// Every connection in the pool shares one named in-memory database, so rows
/// written through one connection are visible through all others. The
/// database is lost when the pool is dropped.
///
/// # Example
///
/// ```
/// use reelstream_db::pool::init_memory_pool;
///
/// let pool = init_memory_pool().unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_memory_pool() -> Result<DbPool> {
    let n = MEMORY_DB_COUNTER.fetch_add(1, Ordering::Relaxed);
    let uri = format!(
        "file:reelstream-mem-{}-{}?mode=memory&cache=shared",
        std::process::id(),
        n
    );
    let manager = SqliteConnectionManager::file(uri)
        .with_init(|conn| conn.execute_batch("PRAGMA busy_timeout = 5000;"));

    build_pool(manager, DEFAULT_POOL_SIZE)
}

fn build_pool(manager: SqliteConnectionManager, max_size: u32) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {}", e)))?;

    let conn = pool
        .get()
        .map_err(|e| Error::database(format!("Failed to get connection for migrations: {}", e)))?;

    migrations::run_migrations(&conn)
        .map_err(|e| Error::database(format!("Failed to run migrations: {}", e)))?;

    Ok(pool)
}

/// Get a connection from the pool.
///
/// This is a convenience wrapper around `pool.get()` that converts the
/// r2d2 error into our common Error type. The connection returns to the pool
/// when the guard is dropped.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_memory_pool() {
        let pool = init_memory_pool().unwrap();
        assert_eq!(pool.max_size(), DEFAULT_POOL_SIZE);
    }

    #[test]
    fn test_init_file_pool() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        let pool = init_pool(path.to_str().unwrap(), 2).unwrap();
        assert_eq!(pool.max_size(), 2);
        assert!(path.exists());
    }

    #[test]
    fn test_migrations_run_on_init() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='videos'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_connections_share_memory_database() {
        let pool = init_memory_pool().unwrap();

        let conn1 = get_conn(&pool).unwrap();
        conn1
            .execute(
                "INSERT INTO videos (id, path, extension, created_at)
                 VALUES ('1', 'a', '.mp4', datetime('now'))",
                [],
            )
            .unwrap();

        // Held open so the pool must hand out a different connection
        let conn2 = get_conn(&pool).unwrap();
        let count: i64 = conn2
            .query_row("SELECT COUNT(*) FROM videos", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        drop(conn1);
    }

    #[test]
    fn test_memory_pools_are_isolated() {
        let a = init_memory_pool().unwrap();
        let b = init_memory_pool().unwrap();

        get_conn(&a)
            .unwrap()
            .execute(
                "INSERT INTO videos (id, path, extension, created_at)
                 VALUES ('1', 'a', '.mp4', datetime('now'))",
                [],
            )
            .unwrap();

        let count: i64 = get_conn(&b)
            .unwrap()
            .query_row("SELECT COUNT(*) FROM videos", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
