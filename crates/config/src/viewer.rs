//! Top-level viewer configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, RpcConfig, WindowConfig};

/// Complete configuration of the viewer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Node endpoint.
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Block window.
    #[serde(default)]
    pub window: WindowConfig,
}

impl ViewerConfig {
    /// Loads the configuration from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc.url.trim().is_empty() {
            return Err(ConfigError::Invalid("rpc.url must not be empty".to_string()));
        }
        if self.rpc.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("rpc.poll_interval_ms must be positive".to_string()));
        }
        if self.rpc.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "rpc.request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.window.window_size == 0 {
            return Err(ConfigError::Invalid("window.window_size must be positive".to_string()));
        }
        if self.window.load_more_blocks == 0 {
            return Err(ConfigError::Invalid(
                "window.load_more_blocks must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
