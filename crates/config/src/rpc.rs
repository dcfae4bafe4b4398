//! Node endpoint configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default JSON-RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Default head poll interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Node endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RpcConfig {
    /// HTTP JSON-RPC endpoint of the node.
    #[serde(default = "default_url")]
    pub url: String,

    /// Interval between two head polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Timeout of a single request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl RpcConfig {
    /// Head poll interval.
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Request timeout.
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

const fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rpc_config() {
        let config = RpcConfig::default();
        assert_eq!(config.url, DEFAULT_RPC_URL);
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_rpc_config_partial_defaults() {
        let config: RpcConfig =
            serde_json::from_str(r#"{"url": "https://node.example"}"#).expect("deserialize");
        assert_eq!(config.url, "https://node.example");
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);

        let config: RpcConfig =
            serde_json::from_str(r#"{"poll_interval_ms": 500}"#).expect("deserialize");
        assert_eq!(config.url, DEFAULT_RPC_URL);
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_rpc_config_toml_roundtrip() {
        let config = RpcConfig {
            url: "http://10.0.0.2:8545".to_string(),
            poll_interval_ms: 750,
            request_timeout_secs: 5,
        };
        let serialized = toml::to_string(&config).expect("serialize toml");
        let deserialized: RpcConfig = toml::from_str(&serialized).expect("deserialize toml");
        assert_eq!(config, deserialized);
    }
}
