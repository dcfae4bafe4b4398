//! The block source trait.

use async_trait::async_trait;
use txscope_primitives::{BlockNumber, Transaction};

use crate::{HeadSubscription, SourceError, SubscriptionId};

/// Chain data the block-window synchronizer consumes.
///
/// Implementations must be cheap to share behind an [`Arc`](std::sync::Arc); every
/// method takes `&self`.
#[async_trait]
pub trait BlockSource: Send + Sync + 'static {
    /// Returns the number of the current head block.
    async fn head_block_number(&self) -> Result<BlockNumber, SourceError>;

    /// Returns every transaction of block `number`, in in-block order.
    ///
    /// A block without transactions yields an empty list. A block the source does not
    /// know yields [`SourceError::BlockNotFound`].
    async fn block_transactions(&self, number: BlockNumber)
    -> Result<Vec<Transaction>, SourceError>;

    /// Starts delivering new head block numbers on a channel.
    async fn subscribe_new_heads(&self) -> Result<HeadSubscription, SourceError>;

    /// Stops a subscription. Unknown or already released ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}
