//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol. Tools are defined in `domains/tools/definitions/` (one file per
//! upstream resource); the ToolRouter is built dynamically in
//! `domains/tools/router.rs`, so adding a tool does not require modifying
//! this file.

use rmcp::{
    ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::config::Config;
use crate::domains::prey::Session;
use crate::domains::tools::build_tool_router;

const INSTRUCTIONS: &str = "\
This server provides access to the Prey device-management API.

Capabilities:
- Account summary and users
- Devices, reports, location history
- Labels, zones, automations, mass actions
- Opt-in write operations for device actions and status

Note: Write tools are disabled unless PREY_ALLOW_WRITE=true.";

/// The main MCP server handler.
///
/// Holds the per-session `(config, client)` pair and the tool router built
/// over it. The session is constructed once and shared by every concurrent
/// tool invocation; only its client's connection pool and limiter windows are
/// mutable shared state.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Per-session Prey configuration and dispatching client.
    session: Arc<Session>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> crate::core::Result<Self> {
        Self::with_cancellation(config, CancellationToken::new())
    }

    /// Create a server whose in-flight upstream work unwinds when `cancel`
    /// fires (process shutdown).
    pub fn with_cancellation(
        config: Config,
        cancel: CancellationToken,
    ) -> crate::core::Result<Self> {
        let session = Arc::new(Session::with_cancellation(config.prey.clone(), cancel)?);
        let config = Arc::new(config);
        Ok(Self {
            tool_router: build_tool_router::<Self>(session.clone()),
            config,
            session,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the session shared by this server's tool invocations.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// List all available tools (for the HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Server instructions shown to clients.
    pub fn instructions() -> &'static str {
        INSTRUCTIONS
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_builds_from_default_config() {
        let server = McpServer::new(Config::default()).expect("server should build");
        assert_eq!(server.name(), "prey-mcp-server");
        assert!(!server.list_tools().is_empty());
    }

    #[test]
    fn instructions_mention_write_gate() {
        assert!(McpServer::instructions().contains("PREY_ALLOW_WRITE"));
    }
}
