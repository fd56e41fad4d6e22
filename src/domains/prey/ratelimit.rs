//! Multi-window rate limiting for the upstream Prey API.
//!
//! The API enforces three independent quotas per key: 2 requests/second,
//! 60 requests/minute, and 10,000 requests/hour. Each window is a token
//! bucket; a call proceeds only once every window has admitted it.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use tokio_util::sync::CancellationToken;

use super::error::{ApiError, ApiResult};

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Composition of independent rate-limit windows, admitted in order.
///
/// Windows are awaited sequentially (second, minute, hour). A caller blocked
/// on a later window keeps the tokens it already consumed from earlier ones,
/// which can slightly over-admit relative to a strict composed limit. This
/// matches the upstream quota semantics and is accepted as-is.
pub struct MultiLimiter {
    windows: Vec<DirectLimiter>,
}

impl MultiLimiter {
    /// Compose a limiter from individual windows.
    pub fn new(windows: Vec<DirectLimiter>) -> Self {
        Self { windows }
    }

    /// Build the limiter matching the published Prey API quotas.
    ///
    /// The hourly bucket refills at 10,000/hour but its burst capacity is
    /// 100, not 10,000. The published quota and the deployed cap disagree;
    /// both values are kept as-is until the intended cap is confirmed.
    pub fn for_prey_api() -> Self {
        let per_second = RateLimiter::direct(Quota::per_second(nonzero!(2u32)));
        let per_minute = RateLimiter::direct(Quota::per_minute(nonzero!(60u32)));
        let per_hour = RateLimiter::direct(
            Quota::per_hour(nonzero!(10_000u32)).allow_burst(nonzero!(100u32)),
        );
        Self::new(vec![per_second, per_minute, per_hour])
    }

    /// Block until every window admits one call, or until `cancel` fires.
    ///
    /// Cancellation mid-wait fails immediately with [`ApiError::RateLimited`]
    /// rather than timing out.
    pub async fn wait(&self, cancel: &CancellationToken) -> ApiResult<()> {
        for window in &self.windows {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ApiError::RateLimited),
                _ = window.until_ready() => {}
            }
        }
        Ok(())
    }

    /// Check all windows without waiting. A window that admits keeps its
    /// token spent even when a later window refuses.
    pub fn try_acquire(&self) -> bool {
        self.windows.iter().all(|w| w.check().is_ok())
    }
}
