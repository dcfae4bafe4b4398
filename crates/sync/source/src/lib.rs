//! Block sources for the txscope synchronizer.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/txscope/txscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
pub use error::SourceError;

mod memory;
pub use memory::MemoryBlockSource;

mod subscription;
pub use subscription::{HeadSubscription, SubscriptionGuard, SubscriptionId};

mod traits;
pub use traits::BlockSource;
