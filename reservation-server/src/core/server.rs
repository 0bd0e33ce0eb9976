//! Server Implementation
//!
//! HTTP server startup and graceful shutdown

use std::time::Duration;

use crate::api;
use crate::core::{Config, Result, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<()> {
        self.config.validate()?;

        let state = ServerState::initialize(&self.config).await?;

        if self.config.is_production() && self.config.log_dir.is_none() {
            tracing::warn!("LOG_DIR not set in production, logging to stdout only");
        }

        let app = api::build_app(&state).with_state(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(
            %addr,
            environment = %self.config.environment,
            database = %self.config.database_path,
            "Reservation server listening"
        );

        let grace = Duration::from_millis(self.config.shutdown_timeout_ms);
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let shutdown = async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            let _ = tx.send(());
        };

        let serve = async move { axum::serve(listener, app).with_graceful_shutdown(shutdown).await };
        tokio::select! {
            res = serve => res?,
            _ = async {
                let _ = rx.await;
                tokio::time::sleep(grace).await;
            } => {
                tracing::warn!(
                    timeout_ms = self.config.shutdown_timeout_ms,
                    "Graceful shutdown timed out, closing remaining connections"
                );
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}
