//! Synchronizer error types.

use thiserror::Error;
use txscope_primitives::BlockNumber;
use txscope_source::SourceError;
use txscope_window::WindowError;

/// Errors surfaced by the block-window synchronizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The head query or the head subscription failed.
    #[error("block source unavailable: {0}")]
    SourceUnavailable(#[source] SourceError),

    /// Fetching the transactions of one block failed.
    #[error("failed to fetch block {block}: {source}")]
    Fetch {
        /// Block that could not be fetched.
        block: BlockNumber,
        /// Underlying source error.
        #[source]
        source: SourceError,
    },

    /// Fetched blocks could not be merged into the window.
    #[error("window error: {0}")]
    Window(#[from] WindowError),

    /// The operation needs an initialized window.
    #[error("synchronizer is not initialized")]
    NotInitialized,

    /// The synchronizer is in the failed state and waits for a retry.
    #[error("synchronizer failed; retry before issuing new requests")]
    RetryRequired,

    /// The synchronizer was shut down.
    #[error("synchronizer is shut down")]
    ShutDown,
}

impl SyncError {
    /// Returns true for errors that move the synchronizer into the failed state.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_) | Self::Fetch { .. } | Self::Window(_))
    }
}
