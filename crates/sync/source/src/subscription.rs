//! Head subscriptions and their release guard.

use std::{fmt, sync::Arc};

use tokio::sync::mpsc::{UnboundedReceiver, error::TryRecvError};
use tracing::debug;
use txscope_primitives::BlockNumber;

use crate::BlockSource;

/// Identifier of a head subscription, unique per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// A live head subscription: new head numbers arrive on `receiver`.
#[derive(Debug)]
pub struct HeadSubscription {
    id: SubscriptionId,
    receiver: UnboundedReceiver<BlockNumber>,
}

impl HeadSubscription {
    /// Wraps the receiving end of a head channel.
    pub fn new(id: SubscriptionId, receiver: UnboundedReceiver<BlockNumber>) -> Self {
        Self { id, receiver }
    }

    /// The subscription id.
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Waits for the next head number. Returns `None` once the source closed the channel.
    pub async fn recv(&mut self) -> Option<BlockNumber> {
        self.receiver.recv().await
    }
}

/// Owns a [`HeadSubscription`] and unsubscribes it from its source exactly once.
///
/// Release happens on [`SubscriptionGuard::release`] or, failing that, on drop.
pub struct SubscriptionGuard<S: BlockSource + ?Sized> {
    source: Arc<S>,
    subscription: Option<HeadSubscription>,
}

impl<S: BlockSource + ?Sized> fmt::Debug for SubscriptionGuard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("id", &self.subscription.as_ref().map(HeadSubscription::id))
            .finish_non_exhaustive()
    }
}

impl<S: BlockSource + ?Sized> SubscriptionGuard<S> {
    /// Takes ownership of `subscription`, which was obtained from `source`.
    pub fn new(source: Arc<S>, subscription: HeadSubscription) -> Self {
        Self { source, subscription: Some(subscription) }
    }

    /// The id of the subscription while it is still held.
    pub fn id(&self) -> Option<SubscriptionId> {
        self.subscription.as_ref().map(HeadSubscription::id)
    }

    /// Returns true until the subscription has been released.
    pub const fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Waits for the next head notification, coalescing every notification that is
    /// already queued into the highest one.
    ///
    /// Returns `None` once released or when the source closed the channel.
    pub async fn next_head(&mut self) -> Option<BlockNumber> {
        let receiver = &mut self.subscription.as_mut()?.receiver;
        let mut head = receiver.recv().await?;
        loop {
            match receiver.try_recv() {
                Ok(next) => head = head.max(next),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        Some(head)
    }

    /// Unsubscribes from the source. Later calls do nothing.
    pub fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            debug!(id = %subscription.id, "releasing head subscription");
            self.source.unsubscribe(subscription.id);
        }
    }
}

impl<S: BlockSource + ?Sized> Drop for SubscriptionGuard<S> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBlockSource;

    #[tokio::test]
    async fn release_unsubscribes_once() {
        let source = Arc::new(MemoryBlockSource::new());
        let subscription = source.subscribe_new_heads().await.unwrap();
        let mut guard = SubscriptionGuard::new(Arc::clone(&source), subscription);
        assert_eq!(source.active_subscriptions(), 1);

        guard.release();
        guard.release();
        drop(guard);

        assert_eq!(source.active_subscriptions(), 0);
        assert_eq!(source.released_subscriptions(), 1);
    }

    #[tokio::test]
    async fn drop_releases() {
        let source = Arc::new(MemoryBlockSource::new());
        let subscription = source.subscribe_new_heads().await.unwrap();
        let guard = SubscriptionGuard::new(Arc::clone(&source), subscription);
        assert!(guard.is_active());

        drop(guard);

        assert_eq!(source.released_subscriptions(), 1);
    }

    #[tokio::test]
    async fn queued_heads_coalesce() {
        let source = Arc::new(MemoryBlockSource::new());
        let subscription = source.subscribe_new_heads().await.unwrap();
        let mut guard = SubscriptionGuard::new(Arc::clone(&source), subscription);

        source.advance_head(3);
        source.advance_head(5);
        source.advance_head(4);

        assert_eq!(guard.next_head().await, Some(5));
    }

    #[tokio::test]
    async fn released_guard_yields_nothing() {
        let source = Arc::new(MemoryBlockSource::new());
        let subscription = source.subscribe_new_heads().await.unwrap();
        let mut guard = SubscriptionGuard::new(Arc::clone(&source), subscription);

        guard.release();

        assert_eq!(guard.id(), None);
        assert_eq!(guard.next_head().await, None);
    }
}
