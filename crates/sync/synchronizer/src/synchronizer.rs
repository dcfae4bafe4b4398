//! The block-window state machine.

use std::{fmt, sync::Arc};

use tokio::sync::watch;
use tracing::{debug, info, trace, warn};
use txscope_primitives::{BlockNumber, qualifying};
use txscope_source::{BlockSource, SubscriptionGuard};
use txscope_window::{BlockTransactions, FetchPlan, FetchedBatch, TransactionSet, Window};

use crate::{PendingOperation, SyncConfig, SyncError, SyncSnapshot, SyncState};

/// Keeps the qualifying transactions of a contiguous block window in step with a
/// [`BlockSource`].
///
/// Newer blocks are prepended as the head advances, older blocks are appended on
/// request. Every operation takes `&mut self`, so fetch batches never overlap. A batch
/// is staged completely before it is merged: on failure the window and transactions
/// stay at their last good value, the synchronizer enters [`SyncState::Failed`] and
/// remembers the operation for [`BlockWindowSynchronizer::retry`].
pub struct BlockWindowSynchronizer<S: BlockSource + ?Sized> {
    source: Arc<S>,
    config: SyncConfig,
    state: SyncState,
    window: Option<Window>,
    transactions: TransactionSet,
    subscription: Option<SubscriptionGuard<S>>,
    failed: Option<PendingOperation>,
    deferred_head: Option<BlockNumber>,
    last_error: Option<String>,
    observer: watch::Sender<SyncSnapshot>,
}

impl<S: BlockSource + ?Sized> fmt::Debug for BlockWindowSynchronizer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockWindowSynchronizer")
            .field("state", &self.state)
            .field("window", &self.window)
            .field("transactions", &self.transactions.len())
            .field("subscription", &self.subscription)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

impl<S: BlockSource + ?Sized> BlockWindowSynchronizer<S> {
    /// Creates an uninitialized synchronizer reading from `source`.
    pub fn new(source: Arc<S>, config: SyncConfig) -> Self {
        let (observer, _) = watch::channel(SyncSnapshot::default());
        Self {
            source,
            config,
            state: SyncState::Uninitialized,
            window: None,
            transactions: TransactionSet::new(),
            subscription: None,
            failed: None,
            deferred_head: None,
            last_error: None,
            observer,
        }
    }

    /// Returns a receiver that sees a new [`SyncSnapshot`] after every state change.
    pub fn watch(&self) -> watch::Receiver<SyncSnapshot> {
        self.observer.subscribe()
    }

    /// Current state.
    pub const fn state(&self) -> SyncState {
        self.state
    }

    /// Window represented, once initialized.
    pub const fn window(&self) -> Option<Window> {
        self.window
    }

    /// Transactions of the window.
    pub const fn transactions(&self) -> &TransactionSet {
        &self.transactions
    }

    /// Configuration in use.
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Message of the error behind the failed state.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The operation [`Self::retry`] would re-run.
    pub const fn failed_operation(&self) -> Option<PendingOperation> {
        self.failed
    }

    /// Returns true while the head subscription is held.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(SubscriptionGuard::is_active)
    }

    /// Builds the snapshot the presentation layer observes.
    pub fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            state: self.state,
            window: self.window,
            transactions: self.transactions.to_vec(),
            last_error: self.last_error.clone(),
        }
    }

    /// Observes the chain head, subscribes to new heads and fetches the initial window
    /// of [`SyncConfig::window_size`] blocks ending at the head.
    ///
    /// Returns the current window without fetching when already initialized.
    pub async fn initialize(&mut self) -> Result<Window, SyncError> {
        self.ensure_running()?;
        if let Some(window) = self.window {
            return Ok(window);
        }
        if self.state.is_failed() {
            return Err(SyncError::RetryRequired);
        }
        self.run(PendingOperation::Initialize).await
    }

    /// Extends the window forward to `head`. Heads at or below the window end are
    /// ignored.
    ///
    /// In the failed state nothing is fetched: the head is remembered and caught up
    /// after a successful [`Self::retry`].
    pub async fn on_head_advance(&mut self, head: BlockNumber) -> Result<Window, SyncError> {
        self.ensure_running()?;
        if self.state.is_failed() {
            self.deferred_head = Some(self.deferred_head.map_or(head, |h| h.max(head)));
            debug!(head, "deferring head until retry");
            return Err(SyncError::RetryRequired);
        }
        let window = self.window.ok_or(SyncError::NotInitialized)?;
        if head <= window.end() {
            trace!(head, end = window.end(), "ignoring stale head");
            return Ok(window);
        }
        self.run(PendingOperation::HeadAdvance(head)).await
    }

    /// Extends the window `blocks` further into the past, saturating at genesis.
    ///
    /// On failure the window start is not moved, so a retry fetches the same range.
    pub async fn load_more(&mut self, blocks: u64) -> Result<Window, SyncError> {
        self.ensure_running()?;
        if self.state.is_failed() {
            return Err(SyncError::RetryRequired);
        }
        if self.window.is_none() {
            return Err(SyncError::NotInitialized);
        }
        self.run(PendingOperation::LoadMore(blocks)).await
    }

    /// [`Self::load_more`] with [`SyncConfig::load_more_blocks`].
    pub async fn load_more_default(&mut self) -> Result<Window, SyncError> {
        self.load_more(self.config.load_more_blocks).await
    }

    /// Re-runs the operation that failed, then catches up with any head observed
    /// meanwhile. Outside the failed state this does nothing.
    pub async fn retry(&mut self) -> Result<Window, SyncError> {
        self.ensure_running()?;
        let Some(operation) = self.failed else {
            return self.window.ok_or(SyncError::NotInitialized);
        };

        info!(?operation, "retrying failed operation");
        let mut window = self.run(operation).await?;
        if let Some(head) = self.deferred_head.take() {
            if head > window.end() {
                window = self.run(PendingOperation::HeadAdvance(head)).await?;
            }
        }
        Ok(window)
    }

    /// Waits for the next head notification. Notifications already queued are
    /// coalesced into the highest one.
    ///
    /// Returns `None` without a live subscription.
    pub async fn next_head(&mut self) -> Option<BlockNumber> {
        self.subscription.as_mut()?.next_head().await
    }

    /// Releases the head subscription and discards the transactions. Idempotent.
    pub fn shutdown(&mut self) {
        if self.state == SyncState::Stopped {
            return;
        }
        if let Some(mut subscription) = self.subscription.take() {
            subscription.release();
        }
        self.transactions.clear();
        self.window = None;
        self.failed = None;
        self.deferred_head = None;
        self.state = SyncState::Stopped;
        info!("synchronizer shut down");
        self.publish();
    }

    const fn ensure_running(&self) -> Result<(), SyncError> {
        if matches!(self.state, SyncState::Stopped) {
            return Err(SyncError::ShutDown);
        }
        Ok(())
    }

    async fn run(&mut self, operation: PendingOperation) -> Result<Window, SyncError> {
        self.state = SyncState::Syncing;
        self.publish();

        match self.execute(operation).await {
            Ok(window) => {
                self.state = SyncState::Idle;
                self.failed = None;
                self.last_error = None;
                self.publish();
                Ok(window)
            }
            Err(err) => {
                warn!(?operation, error = %err, "synchronization failed");
                self.state = SyncState::Failed;
                self.failed = Some(operation);
                self.last_error = Some(err.to_string());
                self.publish();
                Err(err)
            }
        }
    }

    async fn execute(&mut self, operation: PendingOperation) -> Result<Window, SyncError> {
        let target = match (operation, self.window) {
            (PendingOperation::Initialize, Some(window)) => return Ok(window),
            (PendingOperation::Initialize, None) => {
                let head =
                    self.source.head_block_number().await.map_err(SyncError::SourceUnavailable)?;
                self.subscribe().await?;
                Window::ending_at(head, self.config.window_size)
            }
            (PendingOperation::HeadAdvance(head), Some(window)) => match window.advanced_to(head) {
                Some(target) => target,
                None => return Ok(window),
            },
            (PendingOperation::LoadMore(blocks), Some(window)) => {
                match window.extended_back(blocks) {
                    Some(target) => target,
                    None => {
                        debug!(start = window.start(), blocks, "no older blocks to load");
                        return Ok(window);
                    }
                }
            }
            (PendingOperation::HeadAdvance(_) | PendingOperation::LoadMore(_), None) => {
                return Err(SyncError::NotInitialized);
            }
        };
        self.sync_to(target).await
    }

    async fn subscribe(&mut self) -> Result<(), SyncError> {
        if self.is_subscribed() {
            return Ok(());
        }
        let subscription =
            self.source.subscribe_new_heads().await.map_err(SyncError::SourceUnavailable)?;
        debug!(id = %subscription.id(), "subscribed to new heads");
        self.subscription = Some(SubscriptionGuard::new(Arc::clone(&self.source), subscription));
        Ok(())
    }

    async fn sync_to(&mut self, target: Window) -> Result<Window, SyncError> {
        let plan = FetchPlan::between(self.window, target)?;
        debug!(%target, blocks = plan.len(), "fetching blocks");

        let mut batch = FetchedBatch::new();
        for number in plan.newer() {
            batch.push_newer(self.fetch_block(number).await?);
        }
        for number in plan.older() {
            batch.push_older(self.fetch_block(number).await?);
        }

        let dropped = self.transactions.merge(batch)?;
        if dropped > 0 {
            debug!(dropped, "dropped transactions already listed");
        }
        self.window = Some(target);
        info!(
            start = target.start(),
            end = target.end(),
            transactions = self.transactions.len(),
            "window synced"
        );
        Ok(target)
    }

    async fn fetch_block(&self, number: BlockNumber) -> Result<BlockTransactions, SyncError> {
        let transactions = self
            .source
            .block_transactions(number)
            .await
            .map_err(|source| SyncError::Fetch { block: number, source })?;
        let kept = qualifying(transactions);
        trace!(block = number, kept = kept.len(), "fetched block");
        Ok(BlockTransactions::new(number, kept))
    }

    fn publish(&self) {
        self.observer.send_replace(self.snapshot());
    }
}
