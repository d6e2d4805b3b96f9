//! Dashboard server implementation.

use crate::error::DashboardError;
use crate::routes;
use crate::state::AppState;
use classdeck_core::config::DashboardConfig;
use tokio::net::TcpListener;

/// The dashboard server.
pub struct DashboardServer {
    config: DashboardConfig,
    state: AppState,
}

impl DashboardServer {
    /// Create a new dashboard server serving `state`.
    pub fn new(config: DashboardConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Start the dashboard server. Returns after Ctrl-C.
    pub async fn run(&self) -> Result<(), DashboardError> {
        let addr = self.config.bind_addr();
        tracing::info!(address = %addr, "Starting Classdeck dashboard");

        let app = routes::create_router(self.state.clone());

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| DashboardError::StartupFailed(format!("{addr}: {e}")))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DashboardError::StartupFailed(e.to_string()))?;

        tracing::info!("dashboard stopped");
        Ok(())
    }

    /// Get the configured listen address.
    pub fn bind_addr(&self) -> String {
        self.config.bind_addr()
    }

    /// Get the configured listen port.
    pub fn listen_port(&self) -> u16 {
        self.config.port
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
