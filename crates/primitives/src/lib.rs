//! Core transaction types shared by the txscope crates.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/txscope/txscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub use alloy_primitives::{Address, B256, U256};

mod transaction;
pub use transaction::{Transaction, qualifying};

/// Height of a block on the chain.
pub type BlockNumber = u64;
