use chrono::Local;
use serde::{Deserialize, Serialize};

/// Reserved recipient name addressing every participant in the room.
pub const BROADCAST_TO: &str = "Todos";

/// Text of the arrival announcement appended on registration.
pub const JOINED_TEXT: &str = "entra na sala...";

/// Text of the departure announcement appended on eviction.
pub const LEFT_TEXT: &str = "Sai da sala...";

const TIME_FORMAT: &str = "%H:%M:%S";

/// A registered chat participant
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Participant {
    pub name: String,
    /// Last activity mark, milliseconds since the Unix epoch
    #[serde(rename = "lastStatus")]
    pub last_status: i64,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    #[sqlx(rename = "sender")]
    pub from: String,
    #[sqlx(rename = "recipient")]
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Wall-clock time of day the message was recorded, `HH:MM:SS`
    pub time: String,
}

impl Message {
    /// A participant-submitted message, stamped with the current time.
    pub fn user(from: &str, to: &str, text: &str, kind: MessageKind) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            text: text.to_string(),
            kind,
            time: now_hms(),
        }
    }

    /// System announcement that `name` entered the room.
    pub fn joined(name: &str) -> Self {
        Self {
            from: name.to_string(),
            to: BROADCAST_TO.to_string(),
            text: JOINED_TEXT.to_string(),
            kind: MessageKind::Status,
            time: now_hms(),
        }
    }

    /// System announcement that `name` left the room.
    pub fn left(name: &str) -> Self {
        Self {
            from: name.to_string(),
            to: BROADCAST_TO.to_string(),
            text: LEFT_TEXT.to_string(),
            kind: MessageKind::Status,
            time: now_hms(),
        }
    }
}

/// Message category. `Status` is reserved for system announcements and is
/// never accepted from clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum MessageKind {
    Status,
    Message,
    PrivateMessage,
}

/// Body of `POST /participants`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterInput {
    pub name: String,
}

/// Body of `POST /messages`. The kind arrives as a raw string so that
/// reserved or unknown values surface as validation errors rather than
/// deserialization failures.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageInput {
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Query string of `GET /messages`
#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub limit: Option<String>,
}

fn now_hms() -> String {
    Local::now().format(TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_wire_shape() {
        let msg = Message::user("Alice", "Bob", "oi", MessageKind::PrivateMessage);
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["from"], "Alice");
        assert_eq!(value["to"], "Bob");
        assert_eq!(value["text"], "oi");
        assert_eq!(value["type"], "private_message");
    }

    #[test]
    fn participant_wire_shape() {
        let participant = Participant {
            name: "Alice".to_string(),
            last_status: 1_700_000_000_000,
        };
        let value = serde_json::to_value(&participant).unwrap();

        assert_eq!(value["name"], "Alice");
        assert_eq!(value["lastStatus"], 1_700_000_000_000i64);
    }

    #[test]
    fn announcements_are_broadcast_status_messages() {
        let joined = Message::joined("Alice");
        assert_eq!(joined.from, "Alice");
        assert_eq!(joined.to, BROADCAST_TO);
        assert_eq!(joined.text, JOINED_TEXT);
        assert_eq!(joined.kind, MessageKind::Status);

        let left = Message::left("Alice");
        assert_eq!(left.text, LEFT_TEXT);
        assert_eq!(left.kind, MessageKind::Status);
    }

    #[test]
    fn time_is_clock_of_day() {
        let msg = Message::joined("Alice");
        let bytes = msg.time.as_bytes();

        assert_eq!(bytes.len(), 8);
        assert_eq!(bytes[2], b':');
        assert_eq!(bytes[5], b':');
    }
}
