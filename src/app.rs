//! Application orchestration.
//!
//! Wires the engine, the settlement clock, and the WebSocket gateway
//! together and runs them until shutdown.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::config::Config;
use crate::domain::stakes::SETTLEMENT_TICK;
use crate::engine::{Engine, SettlementClock};
use crate::error::Result;
use crate::gateway;

/// Main application orchestrator.
pub struct App;

impl App {
    /// Run the service until the process is signalled.
    pub async fn run(config: Config) -> Result<()> {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        Self::run_with_shutdown(config, shutdown_rx).await
    }

    /// Run the service until the shutdown channel flips to `true`.
    pub async fn run_with_shutdown(
        config: Config,
        shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        let engine = Arc::new(Engine::new());

        let listener = TcpListener::bind(&config.server.bind).await?;
        info!(addr = %config.server.bind, "Gateway listening");

        let clock = SettlementClock::new(Arc::clone(&engine), SETTLEMENT_TICK);
        let clock_handle = clock.spawn(shutdown.clone());

        let result = gateway::run(engine, listener, shutdown).await;

        // The clock shares the same shutdown channel; wait for it to wind down.
        let _ = clock_handle.await;

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn app_starts_and_stops_on_shutdown() {
        let config = Config {
            server: crate::config::ServerConfig {
                bind: "127.0.0.1:0".into(),
            },
            ..Default::default()
        };
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let app = tokio::spawn(App::run_with_shutdown(config, shutdown_rx));
        tokio::time::sleep(Duration::from_millis(50)).await;

        shutdown_tx.send(true).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(2), app)
            .await
            .expect("app wound down in time")
            .expect("app task not panicked");
        assert!(result.is_ok());
    }
}
