//! Block window configuration.

use serde::{Deserialize, Serialize};

/// Default number of blocks shown after startup.
pub const DEFAULT_WINDOW_SIZE: u64 = 1;

/// Default number of older blocks added by "load more".
pub const DEFAULT_LOAD_MORE_BLOCKS: u64 = 1;

/// Block window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowConfig {
    /// Blocks shown after startup, ending at the head.
    #[serde(default = "default_window_size")]
    pub window_size: u64,

    /// Older blocks added by one "load more".
    #[serde(default = "default_load_more_blocks")]
    pub load_more_blocks: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { window_size: DEFAULT_WINDOW_SIZE, load_more_blocks: DEFAULT_LOAD_MORE_BLOCKS }
    }
}

const fn default_window_size() -> u64 {
    DEFAULT_WINDOW_SIZE
}

const fn default_load_more_blocks() -> u64 {
    DEFAULT_LOAD_MORE_BLOCKS
}
