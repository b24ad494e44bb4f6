//! Dashboard server startup

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use bw_core::config::DashboardConfig;
use tracing::info;

use crate::api::{create_router, BookingProvider, DashboardState, SlotProvider};
use crate::error::{DashboardError, Result};

/// Dashboard server
pub struct DashboardServer {
    config: DashboardConfig,
    state: DashboardState,
}

impl DashboardServer {
    /// Create a new dashboard server
    pub fn new(
        config: DashboardConfig,
        slots: Arc<dyn SlotProvider + Send + Sync>,
        bookings: Arc<dyn BookingProvider + Send + Sync>,
    ) -> Self {
        Self {
            config,
            state: DashboardState::new(slots, bookings),
        }
    }

    /// Get the router
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| DashboardError::ConfigError(format!("Invalid address: {}", e)))
    }

    /// Start the server
    pub async fn run(self) -> Result<()> {
        let addr = self.socket_addr()?;
        let app = self.router();

        info!("Dashboard server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| DashboardError::ServerError(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| DashboardError::ServerError(format!("Server error: {}", e)))?;

        Ok(())
    }
}
