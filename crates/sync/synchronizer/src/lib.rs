//! Block-window synchronization for the txscope viewer.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/txscope/txscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{
    DEFAULT_COMMAND_CAPACITY, DEFAULT_LOAD_MORE_BLOCKS, DEFAULT_WINDOW_SIZE, SyncConfig,
};

mod error;
pub use error::SyncError;

mod service;
pub use service::{SyncCommand, SyncHandle, SyncService};

mod state;
pub use state::{PendingOperation, SyncSnapshot, SyncState};

mod synchronizer;
pub use synchronizer::BlockWindowSynchronizer;
