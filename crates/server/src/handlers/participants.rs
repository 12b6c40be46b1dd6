//! Participant handlers

use crate::config::AppState;
use crate::error::Result;
use crate::models::{Message, Participant, RegisterInput};
use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, warn};

/// POST /participants
///
/// Registers a new participant and announces the arrival on the
/// broadcast channel.
pub async fn register_participant(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<StatusCode> {
    info!("POST /participants - {:?}", input.name);

    if let Err(err) = state.directory.register(&input.name).await {
        warn!("Registration of {:?} rejected: {}", input.name, err);
        return Err(err);
    }
    state.messages.append(&Message::joined(&input.name)).await?;

    Ok(StatusCode::CREATED)
}

/// GET /participants
pub async fn list_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<Participant>>> {
    info!("GET /participants");

    let participants = state.directory.list().await?;
    Ok(Json(participants))
}
