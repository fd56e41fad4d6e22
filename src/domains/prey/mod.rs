//! Prey API client domain.
//!
//! Everything needed to turn a validated tool invocation into a throttled,
//! authenticated upstream HTTP call and a normalized `{data, meta?}` result:
//!
//! - `ratelimit` - multi-window token-bucket admission
//! - `request` - outbound request construction
//! - `client` - the dispatching client and per-session carrier
//! - `guardrails` - allowlist / write-permission gate
//! - `mask`, `pagination`, `validate`, `response` - shared tool helpers

pub mod client;
pub mod error;
pub mod guardrails;
pub mod mask;
pub mod pagination;
pub mod ratelimit;
pub mod request;
pub mod response;
pub mod validate;

pub use client::{PreyClient, Session};
pub use error::{ApiError, ApiResult};
pub use guardrails::{ensure_tool_allowed, is_tool_allowed};
pub use mask::mask_sensitive;
pub use ratelimit::MultiLimiter;
pub use request::ApiRequest;
pub use response::wrap;
