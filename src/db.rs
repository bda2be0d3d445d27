use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use crate::error::Result;
use std::str::FromStr;
use std::time::Duration;

/// Creates a new database connection pool.
///
/// The database file is created when missing. WAL mode plus a busy timeout
/// let concurrent writers queue on SQLite's own lock instead of failing.
///
/// # Arguments
///
/// * `database_url` - The URL of the SQLite database.
///
/// # Returns
///
/// A `Result` containing the `SqlitePool`.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    Ok(pool)
}
