//! STDIO transport implementation.
//!
//! The default MCP mode: requests arrive on stdin, responses leave on
//! stdout. Logging must stay on stderr or it would corrupt the protocol
//! stream.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve the MCP protocol over stdin/stdout until the client disconnects.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!(
            "Ready - serving {} tools via stdin/stdout",
            server.tool_count()
        );

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(format!("stdio handshake failed: {e}")))?;

        service
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        info!("STDIO client disconnected, shutting down");
        Ok(())
    }
}
