//! Segmented transaction sets.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use txscope_primitives::{B256, BlockNumber, Transaction};

use crate::{Window, WindowError};

/// The qualifying transactions of one block, in in-block order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTransactions {
    /// Block number.
    pub number: BlockNumber,
    /// Transactions of the block. May be empty.
    pub transactions: Vec<Transaction>,
}

impl BlockTransactions {
    /// Creates a segment for `number`.
    pub const fn new(number: BlockNumber, transactions: Vec<Transaction>) -> Self {
        Self { number, transactions }
    }
}

/// Blocks fetched for one [`FetchPlan`](crate::FetchPlan), staged before they are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedBatch {
    newer: Vec<BlockTransactions>,
    older: Vec<BlockTransactions>,
}

impl FetchedBatch {
    /// Creates an empty batch.
    pub const fn new() -> Self {
        Self { newer: Vec::new(), older: Vec::new() }
    }

    /// Stages a block newer than the represented range. Push in ascending order.
    pub fn push_newer(&mut self, block: BlockTransactions) {
        self.newer.push(block);
    }

    /// Stages a block older than the represented range. Push in descending order.
    pub fn push_older(&mut self, block: BlockTransactions) {
        self.older.push(block);
    }

    /// Number of staged blocks.
    pub fn block_count(&self) -> usize {
        self.newer.len() + self.older.len()
    }

    /// Returns true if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.newer.is_empty() && self.older.is_empty()
    }
}

/// Transactions of a contiguous block range, newest block first.
///
/// Every block of the covered range has exactly one segment (possibly empty), and no
/// transaction hash appears twice. [`TransactionSet::merge`] either applies a whole
/// batch or leaves the set untouched.
#[derive(Debug, Clone, Default)]
pub struct TransactionSet {
    segments: VecDeque<BlockTransactions>,
    hashes: HashSet<B256>,
}

impl TransactionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The block range represented, or `None` while empty.
    pub fn covered(&self) -> Option<Window> {
        let newest = self.segments.front()?.number;
        let oldest = self.segments.back()?.number;
        Window::new(oldest, newest).ok()
    }

    /// Total number of transactions.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Returns true if the set holds no transaction.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Number of blocks represented, including blocks without transactions.
    pub fn block_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if a transaction with `hash` is represented.
    pub fn contains(&self, hash: &B256) -> bool {
        self.hashes.contains(hash)
    }

    /// Per-block segments, newest first.
    pub fn segments(&self) -> impl Iterator<Item = &BlockTransactions> {
        self.segments.iter()
    }

    /// Transactions, newest block first and in in-block order within a block.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.segments.iter().flat_map(|segment| segment.transactions.iter())
    }

    /// Copies the transactions into a flat list.
    pub fn to_vec(&self) -> Vec<Transaction> {
        self.iter().cloned().collect()
    }

    /// Drops every segment.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.hashes.clear();
    }

    /// Merges a fetched batch: newer blocks go in front, older blocks behind.
    ///
    /// Block numbers are validated as a whole first; on error the set is unchanged.
    /// A staged transaction whose hash is already represented, or was staged earlier in
    /// the batch, is dropped. Returns the number of dropped transactions.
    pub fn merge(&mut self, batch: FetchedBatch) -> Result<usize, WindowError> {
        self.check(&batch)?;

        let mut dropped = 0;
        for mut block in batch.newer {
            dropped += self.admit(&mut block);
            self.segments.push_front(block);
        }
        for mut block in batch.older {
            dropped += self.admit(&mut block);
            self.segments.push_back(block);
        }
        Ok(dropped)
    }

    /// Registers the hashes of `block`, removing repeats. Returns how many were removed.
    fn admit(&mut self, block: &mut BlockTransactions) -> usize {
        let staged = block.transactions.len();
        block.transactions.retain(|tx| self.hashes.insert(tx.hash));
        staged - block.transactions.len()
    }

    fn check(&self, batch: &FetchedBatch) -> Result<(), WindowError> {
        // An empty set is anchored by the first staged block.
        let (mut next_newer, mut next_older) = match self.covered() {
            Some(window) => (window.end() + 1, window.start().checked_sub(1)),
            None => match (batch.older.first(), batch.newer.first()) {
                (Some(first), _) => (first.number + 1, Some(first.number)),
                (None, Some(first)) => (first.number, first.number.checked_sub(1)),
                (None, None) => return Ok(()),
            },
        };

        for block in &batch.newer {
            if block.number != next_newer {
                return Err(WindowError::NonContiguous { expected: next_newer, got: block.number });
            }
            next_newer += 1;
        }
        for block in &batch.older {
            let Some(expected) = next_older else {
                return Err(WindowError::PastGenesis(block.number));
            };
            if block.number != expected {
                return Err(WindowError::NonContiguous { expected, got: block.number });
            }
            next_older = expected.checked_sub(1);
        }
        Ok(())
    }
}
