//! Value-transfer transactions as listed by the viewer.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::BlockNumber;

/// A transaction observed in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction hash.
    pub hash: B256,
    /// Number of the block containing this transaction.
    pub block_number: BlockNumber,
    /// Index of the transaction within the block.
    pub index: u64,
    /// Sender address.
    pub from: Address,
    /// Recipient address (None for contract creation).
    pub to: Option<Address>,
    /// Value transferred, in wei.
    pub value: U256,
}

impl Transaction {
    /// Returns true if this is a plain value transfer: it has a recipient and moves a
    /// positive amount of ether.
    pub fn is_qualifying(&self) -> bool {
        self.to.is_some() && !self.value.is_zero()
    }
}

/// Keeps the qualifying transactions of a block, preserving in-block order.
pub fn qualifying(transactions: impl IntoIterator<Item = Transaction>) -> Vec<Transaction> {
    transactions.into_iter().filter(Transaction::is_qualifying).collect()
}
