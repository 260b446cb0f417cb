//! Interface server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::http::routes::create_router;
use crate::state::AppState;

/// Interface server configuration.
#[derive(Debug, Clone)]
pub struct InterfaceConfig {
    pub host: String,
    pub port: u16,
}

impl InterfaceConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// The interface server.
pub struct InterfaceServer {
    config: InterfaceConfig,
    state: Arc<AppState>,
}

impl InterfaceServer {
    pub fn new(config: InterfaceConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Get the server address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = create_router(self.state.clone());

        let addr: SocketAddr = self.addr().parse()?;
        let listener = TcpListener::bind(addr).await?;

        info!("Interface server listening on {}", addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Interface server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    // Ctrl-C handler failures leave the server running until killed.
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckflow_checkpoint::{MemorySnapshotStore, SnapshotManager};
    use deckflow_protocols::MockGenerator;
    use deckflow_workflow::WorkflowEngine;

    fn create_test_state() -> Arc<AppState> {
        let snapshots = Arc::new(SnapshotManager::new(
            Arc::new(MemorySnapshotStore::new()),
            0,
        ));
        let engine = Arc::new(WorkflowEngine::new(
            Arc::new(MockGenerator::new()),
            snapshots,
        ));
        Arc::new(AppState::new(engine))
    }

    #[test]
    fn test_interface_config_default() {
        let config = InterfaceConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_interface_server_addr_format() {
        let config = InterfaceConfig::new("192.168.1.1", 443);
        let server = InterfaceServer::new(config, create_test_state());
        assert_eq!(server.addr(), "192.168.1.1:443");
    }

    #[tokio::test]
    async fn test_run_rejects_bad_address() {
        let config = InterfaceConfig::new("not a host", 8080);
        let server = InterfaceServer::new(config, create_test_state());
        assert!(server.run().await.is_err());
    }
}
