//! Business logic organized by bounded contexts.
//!
//! - **prey**: the upstream API client (rate limiter, request builder,
//!   dispatching client, shared tool helpers)
//! - **tools**: MCP tools exposed to clients, one thin definition per
//!   upstream operation

pub mod prey;
pub mod tools;
