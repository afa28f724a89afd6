use anyhow::Result;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{ConnectOptions, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::log::LevelFilter;

/// Connection options shared by every pool. PRAGMAs are set on each
/// connection as it is opened, not once per pool.
fn connect_options(database_url: &str) -> Result<SqliteConnectOptions> {
    Ok(SqliteConnectOptions::from_str(database_url)?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .synchronous(SqliteSynchronous::Normal)
        .pragma("cache_size", "-20000")
        .foreign_keys(true)
        .pragma("temp_store", "memory")
        .log_statements(LevelFilter::Debug))
}

/// Read-only pool; size it after the number of CPU cores.
///
/// Open the write pool first so the database file exists and is in WAL mode.
pub async fn create_read_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = connect_options(database_url)?.read_only(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    tracing::info!(max_connections, "created read-only pool");

    Ok(pool)
}

/// Single-connection pool for every write and transaction, avoiding SQLITE_BUSY.
pub async fn create_write_pool(database_url: &str) -> Result<SqlitePool> {
    let options = connect_options(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    tracing::info!("created read-write pool with 1 max connection");

    Ok(pool)
}

/// Read-write pool for CLI commands, where read/write separation buys nothing.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = connect_options(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    tracing::info!(max_connections, "created pool");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool_applies_pragmas() {
        let dir = temp_dir::TempDir::new().unwrap();
        let url = format!("sqlite:{}", dir.child("db.sqlite3").display());
        let pool = create_pool(&url, 1).await.unwrap();

        let journal_mode: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(journal_mode.0, "wal");

        let foreign_keys: (i32,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(foreign_keys.0, 1);

        // 2 = memory
        let temp_store: (i32,) = sqlx::query_as("PRAGMA temp_store")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(temp_store.0, 2);
    }

    #[tokio::test]
    async fn test_read_pool_rejects_writes() {
        let dir = temp_dir::TempDir::new().unwrap();
        let url = format!("sqlite:{}", dir.child("db.sqlite3").display());
        let write = create_write_pool(&url).await.unwrap();
        sqlx::query("CREATE TABLE t (id INTEGER)")
            .execute(&write)
            .await
            .unwrap();

        let read = create_read_pool(&url, 2).await.unwrap();
        let result = sqlx::query("INSERT INTO t (id) VALUES (1)")
            .execute(&read)
            .await;

        assert!(result.is_err());
    }
}
