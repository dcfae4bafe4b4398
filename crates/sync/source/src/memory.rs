//! In-memory block source.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::trace;
use txscope_primitives::{BlockNumber, Transaction};

use crate::{BlockSource, HeadSubscription, SourceError, SubscriptionId};

#[derive(Debug, Default)]
struct MemoryChain {
    head: BlockNumber,
    blocks: BTreeMap<BlockNumber, Vec<Transaction>>,
    failing: HashSet<BlockNumber>,
    stalled: HashSet<BlockNumber>,
    unavailable: bool,
    refuse_subscriptions: bool,
    subscribers: HashMap<SubscriptionId, UnboundedSender<BlockNumber>>,
    next_subscription: u64,
    released: usize,
    fetches: Vec<BlockNumber>,
}

enum Fetch {
    Ready(Result<Vec<Transaction>, SourceError>),
    Stalled,
}

/// A chain held in memory.
///
/// Blocks at or below the head that were never inserted are empty. Failures can be
/// injected per block, the head query can be made unavailable, and a block fetch can
/// be stalled forever to observe behaviour while a fetch is in flight.
#[derive(Debug, Default)]
pub struct MemoryBlockSource {
    chain: RwLock<MemoryChain>,
}

impl MemoryBlockSource {
    /// Creates an empty chain with its head at genesis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty chain with its head at `head`.
    pub fn with_head(head: BlockNumber) -> Self {
        let source = Self::new();
        source.chain.write().head = head;
        source
    }

    /// Stores the transactions of block `number`. Does not move the head.
    pub fn insert_block(&self, number: BlockNumber, transactions: Vec<Transaction>) {
        self.chain.write().blocks.insert(number, transactions);
    }

    /// Appends a block on top of the head, advances the head to it and notifies
    /// subscribers. Returns the new block number.
    pub fn push_block(&self, transactions: Vec<Transaction>) -> BlockNumber {
        let number = {
            let mut chain = self.chain.write();
            let number = chain.head + 1;
            chain.blocks.insert(number, transactions);
            number
        };
        self.advance_head(number);
        number
    }

    /// Moves the head to `head` and notifies every subscriber.
    pub fn advance_head(&self, head: BlockNumber) {
        let mut chain = self.chain.write();
        chain.head = head;
        chain.subscribers.retain(|id, sender| {
            let delivered = sender.send(head).is_ok();
            if !delivered {
                trace!(%id, "dropping closed head subscriber");
            }
            delivered
        });
    }

    /// The current head.
    pub fn head(&self) -> BlockNumber {
        self.chain.read().head
    }

    /// Makes every fetch of `number` fail until [`Self::heal_block`] is called.
    pub fn fail_block(&self, number: BlockNumber) {
        self.chain.write().failing.insert(number);
    }

    /// Undoes [`Self::fail_block`].
    pub fn heal_block(&self, number: BlockNumber) {
        self.chain.write().failing.remove(&number);
    }

    /// Makes every fetch of `number` wait forever.
    pub fn stall_block(&self, number: BlockNumber) {
        self.chain.write().stalled.insert(number);
    }

    /// Makes the head query fail while `unavailable` is set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.chain.write().unavailable = unavailable;
    }

    /// Makes new subscriptions fail while `refuse` is set.
    pub fn refuse_subscriptions(&self, refuse: bool) {
        self.chain.write().refuse_subscriptions = refuse;
    }

    /// Number of subscriptions not yet released.
    pub fn active_subscriptions(&self) -> usize {
        self.chain.read().subscribers.len()
    }

    /// Number of subscriptions released through [`BlockSource::unsubscribe`].
    pub fn released_subscriptions(&self) -> usize {
        self.chain.read().released
    }

    /// Every block number requested so far, in request order.
    pub fn fetch_log(&self) -> Vec<BlockNumber> {
        self.chain.read().fetches.clone()
    }
}

#[async_trait]
impl BlockSource for MemoryBlockSource {
    async fn head_block_number(&self) -> Result<BlockNumber, SourceError> {
        let chain = self.chain.read();
        if chain.unavailable {
            return Err(SourceError::Unavailable("head query refused".to_string()));
        }
        Ok(chain.head)
    }

    async fn block_transactions(
        &self,
        number: BlockNumber,
    ) -> Result<Vec<Transaction>, SourceError> {
        let fetch = {
            let mut chain = self.chain.write();
            chain.fetches.push(number);
            if chain.stalled.contains(&number) {
                Fetch::Stalled
            } else if chain.failing.contains(&number) {
                Fetch::Ready(Err(SourceError::Transport(format!(
                    "injected failure for block {number}"
                ))))
            } else if let Some(transactions) = chain.blocks.get(&number) {
                Fetch::Ready(Ok(transactions.clone()))
            } else if number <= chain.head {
                Fetch::Ready(Ok(Vec::new()))
            } else {
                Fetch::Ready(Err(SourceError::BlockNotFound(number)))
            }
        };

        match fetch {
            Fetch::Ready(result) => result,
            Fetch::Stalled => std::future::pending().await,
        }
    }

    async fn subscribe_new_heads(&self) -> Result<HeadSubscription, SourceError> {
        let mut chain = self.chain.write();
        if chain.refuse_subscriptions {
            return Err(SourceError::Unavailable("subscriptions refused".to_string()));
        }
        let id = SubscriptionId(chain.next_subscription);
        chain.next_subscription += 1;

        let (sender, receiver) = mpsc::unbounded_channel();
        chain.subscribers.insert(id, sender);
        Ok(HeadSubscription::new(id, receiver))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let mut chain = self.chain.write();
        if chain.subscribers.remove(&id).is_some() {
            chain.released += 1;
        }
    }
}
