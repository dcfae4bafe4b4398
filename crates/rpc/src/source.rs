//! [`BlockSource`] over JSON-RPC.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::{
    sync::mpsc::{self, UnboundedSender},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, trace, warn};
use txscope_primitives::{BlockNumber, Transaction};
use txscope_source::{BlockSource, HeadSubscription, SourceError, SubscriptionId};

use crate::{RpcClient, RpcClientError, RpcSourceConfig};

/// Block source backed by an Ethereum node.
///
/// Head subscriptions poll `eth_blockNumber` on their own task. Dropping the source
/// aborts every poller still running.
#[derive(Debug)]
pub struct RpcBlockSource {
    client: RpcClient,
    poll_interval: Duration,
    next_subscription: AtomicU64,
    pollers: Mutex<HashMap<SubscriptionId, JoinHandle<()>>>,
}

impl RpcBlockSource {
    /// Creates a source for the endpoint in `config`.
    pub fn new(config: &RpcSourceConfig) -> Result<Self, RpcClientError> {
        Ok(Self {
            client: RpcClient::new(config)?,
            poll_interval: config.effective_poll_interval(),
            next_subscription: AtomicU64::new(0),
            pollers: Mutex::new(HashMap::new()),
        })
    }

    /// The underlying client.
    pub const fn client(&self) -> &RpcClient {
        &self.client
    }

    /// Number of pollers currently running.
    pub fn active_subscriptions(&self) -> usize {
        self.pollers.lock().len()
    }
}

#[async_trait]
impl BlockSource for RpcBlockSource {
    async fn head_block_number(&self) -> Result<BlockNumber, SourceError> {
        Ok(self.client.block_number().await?)
    }

    async fn block_transactions(
        &self,
        number: BlockNumber,
    ) -> Result<Vec<Transaction>, SourceError> {
        let block =
            self.client.block_by_number(number).await?.ok_or(SourceError::BlockNotFound(number))?;
        trace!(number, transactions = block.transactions.len(), "received block");
        Ok(block.into_transactions())
    }

    async fn subscribe_new_heads(&self) -> Result<HeadSubscription, SourceError> {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::unbounded_channel();

        let poller = tokio::spawn(poll_heads(id, self.client.clone(), self.poll_interval, sender));
        self.pollers.lock().insert(id, poller);
        debug!(%id, interval = ?self.poll_interval, "polling for new heads");

        Ok(HeadSubscription::new(id, receiver))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if let Some(poller) = self.pollers.lock().remove(&id) {
            poller.abort();
            debug!(%id, "stopped polling for new heads");
        }
    }
}

impl Drop for RpcBlockSource {
    fn drop(&mut self) {
        for (_, poller) in self.pollers.get_mut().drain() {
            poller.abort();
        }
    }
}

/// Sends every head above the last one sent. A failed poll is logged and the next
/// tick is awaited as usual.
async fn poll_heads(
    id: SubscriptionId,
    client: RpcClient,
    interval: Duration,
    sender: UnboundedSender<BlockNumber>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last: Option<BlockNumber> = None;

    loop {
        ticker.tick().await;
        match client.block_number().await {
            Ok(head) if last.is_none_or(|last| head > last) => {
                last = Some(head);
                if sender.send(head).is_err() {
                    debug!(%id, "head subscriber gone");
                    return;
                }
            }
            Ok(_) => {}
            Err(err) => warn!(%id, error = %err, "head poll failed"),
        }
    }
}
