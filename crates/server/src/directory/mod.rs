//! Participant Directory
//!
//! Tracks who is currently in the room and when they were last active.
//! Names are case-sensitive and unique; stale entries are removed by the
//! presence sweeper.

use std::time::Duration;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::Participant;

/// Directory of active participants, keyed by name
pub struct ParticipantDirectory {
    pool: SqlitePool,
}

impl ParticipantDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add `name` to the room with the current time as its activity mark.
    pub async fn register(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidInput("name is required".to_string()));
        }

        if self.exists(name).await? {
            return Err(Error::NameTaken);
        }

        let result = sqlx::query("INSERT INTO participants (name, last_status) VALUES (?, ?)")
            .bind(name)
            .bind(Utc::now().timestamp_millis())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                info!("[Directory] {} entered the room", name);
                Ok(())
            }
            // A racing registration can slip past the exists() check; the
            // primary key rejects the loser with the same conflict.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(Error::NameTaken),
            Err(err) => Err(err.into()),
        }
    }

    /// All currently registered participants.
    pub async fn list(&self) -> Result<Vec<Participant>> {
        let participants =
            sqlx::query_as::<_, Participant>("SELECT name, last_status FROM participants")
                .fetch_all(&self.pool)
                .await?;
        Ok(participants)
    }

    /// Whether `name` is currently in the room.
    pub async fn exists(&self, name: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM participants WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Refresh the activity mark of `name`.
    pub async fn touch(&self, name: &str) -> Result<()> {
        let result = sqlx::query("UPDATE participants SET last_status = ? WHERE name = ?")
            .bind(Utc::now().timestamp_millis())
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    /// Remove every participant whose activity mark is older than
    /// `stale_after`, returning the removed records. Announcing the
    /// departures is left to the caller.
    pub async fn evict_stale(&self, stale_after: Duration) -> Result<Vec<Participant>> {
        let cutoff = Utc::now().timestamp_millis() - stale_after.as_millis() as i64;

        let stale = sqlx::query_as::<_, Participant>(
            "SELECT name, last_status FROM participants WHERE last_status < ?",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        if !stale.is_empty() {
            sqlx::query("DELETE FROM participants WHERE last_status < ?")
                .bind(cutoff)
                .execute(&self.pool)
                .await?;
        }

        Ok(stale)
    }
}
