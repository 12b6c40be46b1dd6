//! SQLite storage backend
//!
//! Opens the shared connection pool and creates the schema on startup.
//! The pool is built once and handed to every component; shutdown closes
//! it explicitly.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;

/// Open the database named by `database_url`, creating the file and the
/// schema when missing.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    info!("[Storage] Connected to {}", database_url);

    Ok(pool)
}

/// Create the tables when missing. `participants.name` is the primary
/// key, one record per name.
async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS participants (
            name TEXT PRIMARY KEY,
            last_status INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sender TEXT NOT NULL,
            recipient TEXT NOT NULL,
            text TEXT NOT NULL,
            kind TEXT NOT NULL,
            time TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn creates_database_and_schema() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}/chat.sqlite", dir.path().display());

        let pool = connect(&url).await.unwrap();

        sqlx::query("SELECT name, last_status FROM participants")
            .fetch_all(&pool)
            .await
            .unwrap();
        sqlx::query("SELECT sender, recipient, text, kind, time FROM messages")
            .fetch_all(&pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn connect_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}/chat.sqlite", dir.path().display());

        let pool = connect(&url).await.unwrap();
        sqlx::query("INSERT INTO participants (name, last_status) VALUES ('Alice', 1)")
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        // Reopening must keep existing data intact.
        let pool = connect(&url).await.unwrap();
        let rows = sqlx::query("SELECT name FROM participants")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }
}
