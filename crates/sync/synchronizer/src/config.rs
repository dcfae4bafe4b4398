//! Synchronizer configuration.

/// Default number of blocks represented right after initialization.
pub const DEFAULT_WINDOW_SIZE: u64 = 1;

/// Default number of older blocks a "load more" request adds.
pub const DEFAULT_LOAD_MORE_BLOCKS: u64 = 1;

/// Default capacity of the service command queue.
pub const DEFAULT_COMMAND_CAPACITY: usize = 64;

/// Configuration for the block-window synchronizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Blocks represented after initialization, ending at the head. Zero counts as one.
    pub window_size: u64,
    /// Blocks added by [`load_more_default`](crate::BlockWindowSynchronizer::load_more_default).
    pub load_more_blocks: u64,
    /// Commands the service queues before senders wait.
    pub command_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncConfig {
    /// Creates a configuration with default values.
    pub const fn new() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            load_more_blocks: DEFAULT_LOAD_MORE_BLOCKS,
            command_capacity: DEFAULT_COMMAND_CAPACITY,
        }
    }

    /// Sets the initial window size.
    pub const fn with_window_size(mut self, blocks: u64) -> Self {
        self.window_size = blocks;
        self
    }

    /// Sets the default "load more" step.
    pub const fn with_load_more_blocks(mut self, blocks: u64) -> Self {
        self.load_more_blocks = blocks;
        self
    }

    /// Sets the command queue capacity.
    pub const fn with_command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity;
        self
    }
}
