//! Message Log
//!
//! Append-only log of chat messages with per-recipient visibility. A
//! participant sees broadcast traffic, anything addressed to them, and
//! anything they sent, always in insertion order.

use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::models::{Message, BROADCAST_TO};

pub struct MessageLog {
    pool: SqlitePool,
}

impl MessageLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one message to the log.
    pub async fn append(&self, message: &Message) -> Result<()> {
        sqlx::query(
            "INSERT INTO messages (sender, recipient, text, kind, time) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&message.from)
        .bind(&message.to)
        .bind(&message.text)
        .bind(message.kind)
        .bind(&message.time)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Every message visible to `name`, oldest first.
    pub async fn visible_to(&self, name: &str) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT sender, recipient, text, kind, time FROM messages \
             WHERE recipient = ? OR recipient = ? OR sender = ? \
             ORDER BY id",
        )
        .bind(name)
        .bind(BROADCAST_TO)
        .bind(name)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    /// Like [`Self::visible_to`], truncated to the `limit` most recent
    /// entries. `limit` is the raw query-string value; anything that does
    /// not parse as a non-negative integer is rejected.
    pub async fn visible_to_limited(
        &self,
        name: &str,
        limit: Option<&str>,
    ) -> Result<Vec<Message>> {
        let mut messages = self.visible_to(name).await?;

        let Some(raw) = limit else {
            return Ok(messages);
        };

        let limit: usize = raw
            .parse()
            .map_err(|_| Error::InvalidInput(format!("invalid limit: {raw:?}")))?;

        if limit < messages.len() {
            messages.drain(..messages.len() - limit);
        }
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageKind;
    use crate::storage;
    use tempfile::TempDir;

    async fn test_log() -> (TempDir, MessageLog) {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}/chat.sqlite", dir.path().display());
        let pool = storage::connect(&url).await.unwrap();
        (dir, MessageLog::new(pool))
    }

    fn texts(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.text.as_str()).collect()
    }

    #[tokio::test]
    async fn visibility_filter() {
        let (_dir, log) = test_log().await;

        log.append(&Message::user("Alice", "Bob", "to bob", MessageKind::PrivateMessage))
            .await
            .unwrap();
        log.append(&Message::user("Alice", BROADCAST_TO, "hello all", MessageKind::Message))
            .await
            .unwrap();
        log.append(&Message::user("Bob", "Carol", "from bob", MessageKind::PrivateMessage))
            .await
            .unwrap();
        log.append(&Message::user("Alice", "Carol", "alice to carol", MessageKind::PrivateMessage))
            .await
            .unwrap();

        let visible = log.visible_to("Bob").await.unwrap();
        assert_eq!(texts(&visible), ["to bob", "hello all", "from bob"]);
    }

    #[tokio::test]
    async fn insertion_order_preserved() {
        let (_dir, log) = test_log().await;

        for text in ["first", "second", "third"] {
            log.append(&Message::user("Alice", BROADCAST_TO, text, MessageKind::Message))
                .await
                .unwrap();
        }

        let visible = log.visible_to("Bob").await.unwrap();
        assert_eq!(texts(&visible), ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn kind_round_trips_through_storage() {
        let (_dir, log) = test_log().await;

        log.append(&Message::user("Alice", "Bob", "psst", MessageKind::PrivateMessage))
            .await
            .unwrap();

        let visible = log.visible_to("Bob").await.unwrap();
        assert_eq!(visible[0].kind, MessageKind::PrivateMessage);
    }

    #[tokio::test]
    async fn limit_keeps_most_recent() {
        let (_dir, log) = test_log().await;

        for text in ["one", "two", "three", "four"] {
            log.append(&Message::user("Alice", BROADCAST_TO, text, MessageKind::Message))
                .await
                .unwrap();
        }

        let limited = log.visible_to_limited("Bob", Some("2")).await.unwrap();
        assert_eq!(texts(&limited), ["three", "four"]);

        let all = log.visible_to_limited("Bob", None).await.unwrap();
        assert_eq!(all.len(), 4);

        let oversized = log.visible_to_limited("Bob", Some("10")).await.unwrap();
        assert_eq!(oversized.len(), 4);

        let none = log.visible_to_limited("Bob", Some("0")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn invalid_limit_rejected() {
        let (_dir, log) = test_log().await;

        log.append(&Message::user("Alice", BROADCAST_TO, "hi", MessageKind::Message))
            .await
            .unwrap();

        for bad in ["abc", "-1", "2.5", ""] {
            let err = log.visible_to_limited("Bob", Some(bad)).await.unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "limit {bad:?} accepted");
        }
    }
}
