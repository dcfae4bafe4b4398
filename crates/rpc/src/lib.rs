//! Ethereum JSON-RPC block source.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/txscope/txscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod client;
pub use client::RpcClient;

mod config;
pub use config::{DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT, RpcSourceConfig};

mod error;
pub use error::RpcClientError;

mod source;
pub use source::RpcBlockSource;

mod types;
pub use types::{JsonRpcErrorObject, JsonRpcRequest, JsonRpcResponse, RpcBlock, RpcTransaction};
