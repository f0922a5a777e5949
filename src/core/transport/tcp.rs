//! TCP transport implementation.
//!
//! Raw TCP socket transport carrying line-delimited JSON-RPC messages.
//! Each accepted connection gets its own MCP session over a cloned server.

use rmcp::ServiceExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::McpServer;

/// TCP transport handler.
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    /// Create a new TCP transport with the given config.
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the TCP transport, accepting connections until the process exits.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (JSON-RPC over TCP)", addr);

        loop {
            let (stream, peer_addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    // Avoid spinning on persistent accept errors
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    continue;
                }
            };

            if let Err(e) = stream.set_nodelay(true) {
                warn!("Failed to set TCP_NODELAY for {}: {}", peer_addr, e);
            }

            let server = server.clone();
            tokio::spawn(async move {
                serve_connection(server, stream, peer_addr).await;
            });
        }
    }
}

/// Drive one client session to completion.
async fn serve_connection(server: McpServer, stream: TcpStream, peer_addr: std::net::SocketAddr) {
    let service = match server.serve(stream).await {
        Ok(s) => {
            info!("Client {} connected", peer_addr);
            s
        }
        Err(e) => {
            warn!("Handshake with {} failed: {}", peer_addr, e);
            return;
        }
    };

    match service.waiting().await {
        Ok(_) => info!("Client {} disconnected cleanly", peer_addr),
        Err(e) => warn!("Error while serving client {}: {}", peer_addr, e),
    }
}
