//! STDIO transport implementation.
//!
//! Serves the MCP protocol over stdin/stdout, the default mode. stdout
//! carries protocol frames only, so all logging must stay on stderr.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve a single session over stdin/stdout until the peer disconnects.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - serving MCP over stdin/stdout");

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        service
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        info!("STDIO session closed");
        Ok(())
    }
}
