//! Observable synchronizer state.

use std::fmt;

use serde::{Deserialize, Serialize};
use txscope_primitives::{BlockNumber, Transaction};
use txscope_window::Window;

/// Lifecycle of a synchronizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    /// The chain head has not been observed yet.
    #[default]
    Uninitialized,
    /// A fetch batch is in flight.
    Syncing,
    /// The window is settled.
    Idle,
    /// The last operation failed; waiting for a retry.
    Failed,
    /// Shut down; the subscription is released.
    Stopped,
}

impl SyncState {
    /// Returns true while a fetch batch is in flight.
    pub const fn is_syncing(&self) -> bool {
        matches!(self, Self::Syncing)
    }

    /// Returns true in the failed state.
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Syncing => "syncing",
            Self::Idle => "idle",
            Self::Failed => "failed",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// An operation that can fail and be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOperation {
    /// Initial head query and window fetch.
    Initialize,
    /// Extending the window forward to a head.
    HeadAdvance(BlockNumber),
    /// Extending the window backward by a number of blocks.
    LoadMore(u64),
}

/// Point-in-time view of a synchronizer for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshot {
    /// Current state.
    pub state: SyncState,
    /// Window represented, once initialized.
    pub window: Option<Window>,
    /// Qualifying transactions of the window, newest block first.
    pub transactions: Vec<Transaction>,
    /// Message of the error that caused the failed state.
    pub last_error: Option<String>,
}

impl SyncSnapshot {
    /// Returns true while the synchronizer is fetching.
    pub const fn is_loading(&self) -> bool {
        self.state.is_syncing()
    }

    /// Returns true while the synchronizer waits for a retry.
    pub const fn is_failed(&self) -> bool {
        self.state.is_failed()
    }
}
