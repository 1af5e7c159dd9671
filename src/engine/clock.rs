//! Periodic settlement driver.
//!
//! A single coarse scan on a fixed cadence rather than one timer per
//! arena: worst-case resolution latency is bounded by the tick interval
//! and there is no per-arena timer lifecycle to manage.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::Engine;

/// Drives [`Engine::settle_due`] on a fixed cadence until shutdown.
pub struct SettlementClock {
    engine: Arc<Engine>,
    tick: Duration,
}

impl SettlementClock {
    /// Create a clock over the shared engine.
    #[must_use]
    pub fn new(engine: Arc<Engine>, tick: Duration) -> Self {
        Self { engine, tick }
    }

    /// Spawn the scan loop. The task exits when the shutdown channel
    /// flips to `true` or its sender is dropped.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.tick);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            info!(tick_ms = self.tick.as_millis() as u64, "Settlement clock started");

            loop {
                tokio::select! {
                    result = shutdown.changed() => {
                        if result.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        let resolved = self.engine.settle_due(Utc::now());
                        if !resolved.is_empty() {
                            debug!(count = resolved.len(), "Settlement tick resolved arenas");
                        }
                    }
                }
            }

            info!("Settlement clock stopped");
        })
    }
}
