//! Bate-papo Chat Server Library
//!
//! Participants register a name, exchange broadcast and private messages,
//! and are evicted by a background sweeper once they go quiet.

pub mod config;
pub mod directory;
pub mod error;
pub mod handlers;
pub mod messages;
pub mod models;
pub mod storage;
pub mod sweeper;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{AppState, ServerConfig};
use directory::ParticipantDirectory;
use handlers::{
    get_messages, list_participants, post_message, post_status, register_participant,
};
use messages::MessageLog;
use sweeper::Sweeper;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Participant endpoints
        .route("/participants", post(register_participant).get(list_participants))
        // Message endpoints
        .route("/messages", post(post_message).get(get_messages))
        // Keep-alive
        .route("/status", post(post_status))
        // Health check
        .route("/health", get(health_check))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Already set, ignore
    }

    let config = ServerConfig::from_env();

    info!("=== Bate-papo Server ===");
    info!("Database: {}", config.database_url);

    let pool = storage::connect(&config.database_url).await?;

    let directory = Arc::new(ParticipantDirectory::new(pool.clone()));
    let log = Arc::new(MessageLog::new(pool.clone()));

    // Start the presence sweeper
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = Sweeper::new(
        directory.clone(),
        log.clone(),
        config.sweep_interval,
        config.stale_after,
    );
    let sweeper_handle = tokio::spawn(sweeper.run(shutdown_rx));

    // Create app state
    let state = AppState {
        directory,
        messages: log,
    };

    let app = router(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Running server on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    // Stop the sweeper before closing the storage it writes to.
    let _ = shutdown_tx.send(true);
    let _ = sweeper_handle.await;
    pool.close().await;
    info!("Shutdown complete");

    Ok(())
}

async fn health_check() -> &'static str {
    "OK - Bate-papo Server"
}
