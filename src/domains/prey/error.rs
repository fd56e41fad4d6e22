//! Error types for the Prey API client domain.
//!
//! Every failure a tool can surface maps to exactly one variant here. Errors
//! are returned to the immediate caller without retries; none of them carry
//! the configured API key.

use thiserror::Error;

/// A specialized Result type for Prey API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors produced while validating, gating, or dispatching an upstream call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No API key is configured; checked before any network attempt.
    #[error("missing PREY_API_KEY")]
    MissingApiKey,

    /// A tool argument failed validation (required id, enum membership,
    /// pagination bounds).
    #[error("{0}")]
    Validation(String),

    /// The tool is not present in the configured allowlist.
    #[error("tool not allowed: {0}")]
    ToolNotAllowed(String),

    /// A mutating tool was invoked while writes are disabled.
    #[error("write operations are disabled (PREY_ALLOW_WRITE=false)")]
    WriteDisabled,

    /// The rate-limiter wait was cancelled before a token was granted.
    #[error("request cancelled while waiting for rate limit")]
    RateLimited,

    /// The session was cancelled with the upstream request in flight.
    #[error("request cancelled")]
    Cancelled,

    /// Network-level failure reaching the upstream API.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream responded with status >= 300. Carries the status line only;
    /// the response body is discarded, never parsed.
    #[error("prey api error: {status}")]
    Upstream { status: reqwest::StatusCode },

    /// The request body could not be encoded as JSON.
    #[error("failed to encode request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The response body was not valid JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_carries_status_line() {
        let err = ApiError::Upstream {
            status: reqwest::StatusCode::NOT_FOUND,
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("Not Found"));
    }

    #[test]
    fn write_disabled_names_the_env_gate() {
        assert!(ApiError::WriteDisabled.to_string().contains("PREY_ALLOW_WRITE"));
    }
}
