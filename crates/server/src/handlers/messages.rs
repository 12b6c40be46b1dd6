//! Message handlers

use crate::config::AppState;
use crate::error::{Error, Result};
use crate::models::{Message, MessageInput, MessageKind, MessagesQuery};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{info, warn};

/// Sender identity carried in the `user` header. Absent or non-UTF-8
/// values become the empty string, which never matches a registered name.
fn sender_name(headers: &HeaderMap) -> &str {
    headers
        .get("user")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// POST /messages
///
/// Records a message from the participant named in the `user` header.
pub async fn post_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<MessageInput>,
) -> Result<StatusCode> {
    let from = sender_name(&headers);
    info!("POST /messages - {:?} -> {:?}", from, input.to);

    let kind = validate_input(&input)?;

    if !state.directory.exists(from).await? {
        warn!("Message from {:?} rejected: sender not in the room", from);
        return Err(Error::UnknownSender);
    }

    state
        .messages
        .append(&Message::user(from, &input.to, &input.text, kind))
        .await?;

    Ok(StatusCode::CREATED)
}

/// `to` and `text` must be non-empty; the kind must be `message` or
/// `private_message`. `status` is reserved for system announcements.
fn validate_input(input: &MessageInput) -> Result<MessageKind> {
    if input.to.is_empty() || input.text.is_empty() {
        return Err(Error::InvalidInput("to and text are required".to_string()));
    }
    match input.kind.as_str() {
        "message" => Ok(MessageKind::Message),
        "private_message" => Ok(MessageKind::PrivateMessage),
        other => Err(Error::InvalidInput(format!("invalid message type: {other:?}"))),
    }
}

/// GET /messages
///
/// Returns the messages visible to the participant named in the `user`
/// header; `?limit=N` keeps only the N most recent.
pub async fn get_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Vec<Message>>> {
    let user = sender_name(&headers);
    info!("GET /messages - {:?}", user);

    let messages = state
        .messages
        .visible_to_limited(user, query.limit.as_deref())
        .await?;

    Ok(Json(messages))
}
