//! Block windows and the transaction sets that fill them.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/txscope/txscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::WindowError;

mod plan;
pub use plan::FetchPlan;

mod set;
pub use set::{BlockTransactions, FetchedBatch, TransactionSet};

mod window;
pub use window::Window;
