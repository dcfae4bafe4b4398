//! RPC source configuration.

use std::time::Duration;

/// Default interval between two `eth_blockNumber` polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Default timeout of a single HTTP request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Configuration for [`RpcBlockSource`](crate::RpcBlockSource).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcSourceConfig {
    /// HTTP JSON-RPC endpoint.
    pub url: String,
    /// Interval between head polls.
    pub poll_interval: Duration,
    /// Timeout of a single request.
    pub request_timeout: Duration,
}

impl RpcSourceConfig {
    /// Creates a configuration for `url` with default timings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Sets the head poll interval.
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the request timeout.
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Poll interval actually used; very small values are raised to a floor.
    pub fn effective_poll_interval(&self) -> Duration {
        self.poll_interval.max(MIN_POLL_INTERVAL)
    }
}
