use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

/// Opens the SQLite file backing the record store, creating it if missing.
///
/// One connection only: the store has a single writer, and an in-memory URL
/// (`sqlite::memory:`) would otherwise hand every connection its own database.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    info!("Opening record store at {database_url}...");

    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .max_lifetime(None::<Duration>)
        .idle_timeout(None::<Duration>)
        .connect_with(options)
        .await?;

    info!("Record store ready");
    Ok(pool)
}
