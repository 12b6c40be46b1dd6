//! Server configuration and shared state

use std::sync::Arc;
use std::time::Duration;

use crate::directory::ParticipantDirectory;
use crate::messages::MessageLog;

/// Configuration for the chat server, read once at startup
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Connection string for the SQLite database
    pub database_url: String,
    /// TCP port the HTTP server listens on
    pub port: u16,
    /// How often the presence sweeper runs
    pub sweep_interval: Duration,
    /// Inactivity age beyond which a participant is evicted
    pub stale_after: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:batepapo.sqlite".to_string(),
            port: 5000,
            sweep_interval: Duration::from_secs(15),
            stale_after: Duration::from_secs(10),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the environment (`DATABASE_URL`), falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }
        config
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<ParticipantDirectory>,
    pub messages: Arc<MessageLog>,
}
