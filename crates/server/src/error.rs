use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

pub type Result<T> = core::result::Result<T, Error>;

/// Error taxonomy shared by the directory, the message log, and the
/// HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input: empty name, bad message fields, bad limit.
    #[error("{0}")]
    InvalidInput(String),

    /// Registration under a name that is already in the room.
    #[error("name already taken")]
    NameTaken,

    /// Message submitted under a name the directory does not know.
    #[error("sender is not in the room")]
    UnknownSender,

    /// Keep-alive for a participant the directory does not know.
    #[error("participant not found")]
    NotFound,

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Error::InvalidInput(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Error::NameTaken => (StatusCode::CONFLICT, "name already taken".to_string()),
            Error::UnknownSender => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "sender is not in the room".to_string(),
            ),
            Error::NotFound => (StatusCode::NOT_FOUND, "participant not found".to_string()),
            Error::Storage(err) => {
                error!("Storage error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal storage error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": error_message
            }
        }));

        (status, body).into_response()
    }
}
