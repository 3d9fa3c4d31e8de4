//! Server Implementation
//!
//! Binds the HTTP listener and serves until Ctrl-C.

use tokio::net::TcpListener;

use crate::api;
use crate::core::{Config, MarketError, MarketResult, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state (for sharing with oneshot)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> MarketResult<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let addr = format!("{}:{}", self.config.http_host, self.config.http_port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| {
                MarketError::ServiceUnavailable(format!("Failed to bind {}: {}", addr, e))
            })?;
        tracing::info!(
            addr = %addr,
            environment = %self.config.environment,
            fee_policy = ?self.config.fee_policy,
            "Market server listening"
        );

        let app = api::build_app(&state).with_state(state.clone());
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| MarketError::Internal(format!("HTTP server failed: {}", e)))?;

        state.db.shutdown().await;
        Ok(())
    }
}
