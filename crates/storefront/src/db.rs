//! Session database.
//!
//! # Database: `SQLite`
//!
//! ## Tables
//!
//! - `tower_sessions` - Session records, each holding the visitor's cart
//!
//! The session table is created on connect if it does not exist, so a fresh
//! database file needs no separate migration step.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tower_sessions_sqlx_store::SqliteStore;

/// Create an `SQLite` connection pool and make sure the session table exists.
///
/// The database file is created if missing. Connections are kept open for
/// the life of the pool, so `sqlite::memory:` with a single connection works
/// as a throwaway database.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string
/// * `max_connections` - Pool size
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established or the
/// session table cannot be created.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    SqliteStore::new(pool.clone()).migrate().await?;

    Ok(pool)
}
