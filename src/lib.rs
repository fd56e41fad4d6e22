//! Prey MCP Server Library
//!
//! This crate exposes the Prey device-management REST API as a Model Context
//! Protocol (MCP) server, with a modular architecture organized by domains.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Core infrastructure including configuration, error handling,
//!   the main server, and the transport layer
//! - **domains**: Business logic organized by bounded contexts
//!   - **prey**: The upstream API client (rate limiting, request building,
//!     guardrails, response shaping)
//!   - **tools**: MCP tools wrapping the Prey REST operations
//!
//! # Example
//!
//! ```rust,no_run
//! use prey_mcp_server::{core::Config, core::McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
pub use domains::prey::{PreyClient, Session};
