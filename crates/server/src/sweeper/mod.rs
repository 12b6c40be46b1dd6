//! Presence Sweeper
//!
//! Background task that periodically evicts participants whose last
//! activity is older than the staleness threshold and announces each
//! departure on the broadcast channel. A failed pass is logged and the
//! loop keeps running.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::directory::ParticipantDirectory;
use crate::messages::MessageLog;
use crate::models::Message;

pub struct Sweeper {
    directory: Arc<ParticipantDirectory>,
    log: Arc<MessageLog>,
    interval: Duration,
    stale_after: Duration,
}

impl Sweeper {
    pub fn new(
        directory: Arc<ParticipantDirectory>,
        log: Arc<MessageLog>,
        interval: Duration,
        stale_after: Duration,
    ) -> Self {
        Self {
            directory,
            log,
            interval,
            stale_after,
        }
    }

    /// Sweep on a fixed cadence until `shutdown` fires.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        // The first tick completes immediately; skip it so the first sweep
        // happens one full period after startup.
        ticker.tick().await;

        info!(
            "[Sweeper] Running every {:?}, evicting after {:?} idle",
            self.interval, self.stale_after
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep().await;
                }
                _ = shutdown.changed() => {
                    info!("[Sweeper] Stopped");
                    break;
                }
            }
        }
    }

    /// One eviction pass: remove stale participants and announce each exit.
    pub async fn sweep(&self) {
        let evicted = match self.directory.evict_stale(self.stale_after).await {
            Ok(evicted) => evicted,
            Err(err) => {
                warn!("[Sweeper] Eviction pass failed: {}", err);
                return;
            }
        };

        for participant in evicted {
            info!("[Sweeper] {} timed out, removed from the room", participant.name);
            if let Err(err) = self.log.append(&Message::left(&participant.name)).await {
                warn!(
                    "[Sweeper] Could not announce departure of {}: {}",
                    participant.name, err
                );
            }
        }
    }
}
