//! Configuration types for the txscope viewer.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/txscope/txscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::ConfigError;

mod rpc;
pub use rpc::{
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RPC_URL, RpcConfig,
};

mod viewer;
pub use viewer::ViewerConfig;

mod window;
pub use window::{DEFAULT_LOAD_MORE_BLOCKS, DEFAULT_WINDOW_SIZE, WindowConfig};
