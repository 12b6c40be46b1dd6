//! Keep-alive handler

use crate::config::AppState;
use crate::error::{Error, Result};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{info, warn};

/// POST /status
///
/// Refreshes the activity mark of the participant named in the `user`
/// header. A missing header and an unknown participant both yield 404.
pub async fn post_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    let user = headers
        .get("user")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(Error::NotFound)?;

    info!("POST /status - {:?}", user);

    match state.directory.touch(user).await {
        Ok(()) => Ok(StatusCode::OK),
        Err(Error::NotFound) => {
            warn!("Keep-alive for unknown participant {:?}", user);
            Err(Error::NotFound)
        }
        Err(err) => Err(err),
    }
}
