//! Dispatching client for the Prey API.
//!
//! The client owns the shared HTTP connection pool and the optional
//! multi-window rate limiter. Every upstream call goes through the same
//! sequence: API-key check, limiter admission, authenticated send, status
//! classification. Two call shapes are offered: decode-to-JSON and
//! raw-bytes-with-content-type.

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::core::config::PreyConfig;

use super::error::{ApiError, ApiResult};
use super::ratelimit::MultiLimiter;
use super::request::ApiRequest;

/// Rate-limited, authenticated HTTP client for the Prey API.
///
/// Constructed once per session and shared by every tool invocation in that
/// session; the connection pool and limiter windows are the only state shared
/// across concurrent calls.
pub struct PreyClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
    limiter: Option<MultiLimiter>,
    cancel: CancellationToken,
}

impl PreyClient {
    /// Build a client from session configuration with a fresh cancellation
    /// token.
    pub fn new(config: &PreyConfig) -> ApiResult<Self> {
        Self::with_cancellation(config, CancellationToken::new())
    }

    /// Build a client whose limiter waits and in-flight requests unwind when
    /// `cancel` fires (process shutdown, caller disconnect).
    pub fn with_cancellation(config: &PreyConfig, cancel: CancellationToken) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        let limiter = if config.disable_rate_limit {
            None
        } else {
            Some(MultiLimiter::for_prey_api())
        };
        Ok(Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            http,
            limiter,
            cancel,
        })
    }

    /// True when rate limiting was disabled for this session.
    pub fn rate_limit_disabled(&self) -> bool {
        self.limiter.is_none()
    }

    /// Token that unwinds this client's limiter waits and in-flight requests.
    /// Derived sessions take a child of this token so shutdown reaches them.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Build a request against this client's base URL. Authentication is not
    /// attached here; it happens at dispatch time.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> ApiResult<ApiRequest> {
        ApiRequest::new(&self.base_url, method, path, query, body)
    }

    /// Dispatch and decode the response body as JSON.
    pub async fn dispatch_json<T: DeserializeOwned>(&self, req: ApiRequest) -> ApiResult<T> {
        let resp = self.execute(req).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }

    /// Dispatch and return the raw response body with its content type.
    pub async fn dispatch_raw(&self, req: ApiRequest) -> ApiResult<(Bytes, String)> {
        let resp = self.execute(req).await?;
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = resp.bytes().await?;
        Ok((bytes, content_type))
    }

    /// Shared preamble for every call: fail fast on a missing key, take one
    /// limiter admission, attach auth, send, classify the status.
    async fn execute(&self, req: ApiRequest) -> ApiResult<reqwest::Response> {
        if self.api_key.is_empty() {
            return Err(ApiError::MissingApiKey);
        }
        if let Some(limiter) = &self.limiter {
            limiter.wait(&self.cancel).await?;
        }

        let mut builder = self
            .http
            .request(req.method().clone(), req.url())
            .header("apikey", &self.api_key);
        if let Some(body) = req.body() {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_vec());
        }

        // The send races the session token so cancellation aborts the call
        // instead of riding out the response (or the timeout).
        let resp = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ApiError::Cancelled),
            resp = builder.send() => resp?,
        };
        let status = resp.status();
        if status.as_u16() >= 300 {
            // Body intentionally dropped: upstream error bodies are not parsed.
            return Err(ApiError::Upstream { status });
        }
        Ok(resp)
    }
}

/// Explicit per-session carrier handed to every tool: the immutable
/// configuration plus the client built from it. Replaces ambient lookup.
pub struct Session {
    pub config: PreyConfig,
    pub client: PreyClient,
}

impl Session {
    pub fn new(config: PreyConfig) -> ApiResult<Self> {
        Self::with_cancellation(config, CancellationToken::new())
    }

    pub fn with_cancellation(config: PreyConfig, cancel: CancellationToken) -> ApiResult<Self> {
        let client = PreyClient::with_cancellation(&config, cancel)?;
        Ok(Self { config, client })
    }
}
