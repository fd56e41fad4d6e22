//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Every tool wraps one Prey REST operation behind the shared guardrails
//! (allowlist, write gate) and response envelope.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per resource family)
//! - `router.rs` - Dynamic ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - Central tool registry and HTTP dispatch
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create or extend a file in `definitions/` (e.g., `devices.rs`)
//! 2. Define params, execute(), to_tool(), and create_route()
//! 3. Export in `definitions/mod.rs`
//! 4. Add route in `router.rs` using `with_route()`
//! 5. Register in `registry.rs` for HTTP support
//!
//! **No need to modify `server.rs`!** The router is built dynamically.

pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
