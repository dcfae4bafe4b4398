//! JSON-RPC envelopes and the subset of Ethereum block objects the viewer reads.

use alloy_primitives::{Address, B256, U64, U256};
use serde::{Deserialize, Serialize};
use txscope_primitives::{BlockNumber, Transaction};

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<'a, P> {
    /// Protocol version, always `"2.0"`.
    pub jsonrpc: &'static str,
    /// Method name.
    pub method: &'a str,
    /// Positional parameters.
    pub params: P,
    /// Request id.
    pub id: u64,
}

impl<'a, P> JsonRpcRequest<'a, P> {
    /// Creates a request for `method`.
    pub const fn new(id: u64, method: &'a str, params: P) -> Self {
        Self { jsonrpc: "2.0", method, params, id }
    }
}

/// JSON-RPC 2.0 response envelope. `result` is kept raw so that a `null` result
/// stays distinguishable from a missing one.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    /// Id echoed by the node.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    /// Result payload.
    #[serde(default)]
    pub result: serde_json::Value,
    /// Error object, set when the call failed.
    #[serde(default)]
    pub error: Option<JsonRpcErrorObject>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JsonRpcErrorObject {
    /// Error code.
    pub code: i64,
    /// Error message.
    pub message: String,
}

/// Block returned by `eth_getBlockByNumber` with full transaction objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    /// Block number.
    pub number: U64,
    /// Block hash.
    pub hash: B256,
    /// Transactions in block order.
    #[serde(default)]
    pub transactions: Vec<RpcTransaction>,
}

impl RpcBlock {
    /// Block number as a native integer.
    pub fn block_number(&self) -> BlockNumber {
        self.number.to::<u64>()
    }

    /// Converts every transaction of the block, in block order.
    pub fn into_transactions(self) -> Vec<Transaction> {
        let number = self.block_number();
        self.transactions
            .into_iter()
            .enumerate()
            .map(|(position, tx)| tx.into_transaction(number, position as u64))
            .collect()
    }
}

/// Transaction object of a block response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    /// Transaction hash.
    pub hash: B256,
    /// Block number, absent for pending transactions.
    #[serde(default)]
    pub block_number: Option<U64>,
    /// Position in the block.
    #[serde(default)]
    pub transaction_index: Option<U64>,
    /// Sender.
    pub from: Address,
    /// Recipient, `None` for contract creation.
    #[serde(default)]
    pub to: Option<Address>,
    /// Value transferred in wei.
    pub value: U256,
}

impl RpcTransaction {
    /// Converts into the domain type. `block` and `position` fill in fields the node
    /// left out.
    pub fn into_transaction(self, block: BlockNumber, position: u64) -> Transaction {
        Transaction {
            hash: self.hash,
            block_number: self.block_number.map_or(block, |n| n.to::<u64>()),
            index: self.transaction_index.map_or(position, |i| i.to::<u64>()),
            from: self.from,
            to: self.to,
            value: self.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const BLOCK: &str = r#"{
        "number": "0x12d687",
        "hash": "0x5f2b1a7f1c0fbb1e3d2a8d2c7c3aa0f5f1d1bd5e76a7f9d3a0a2d6c2c1e0f9a8",
        "parentHash": "0x0000000000000000000000000000000000000000000000000000000000000000",
        "timestamp": "0x65f0a1b2",
        "transactions": [
            {
                "hash": "0x1111111111111111111111111111111111111111111111111111111111111111",
                "blockNumber": "0x12d687",
                "transactionIndex": "0x0",
                "from": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "to": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
                "value": "0xde0b6b3a7640000",
                "gas": "0x5208",
                "input": "0x"
            },
            {
                "hash": "0x2222222222222222222222222222222222222222222222222222222222222222",
                "blockNumber": "0x12d687",
                "transactionIndex": "0x1",
                "from": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "to": null,
                "value": "0x0",
                "input": "0x6080"
            }
        ]
    }"#;

    #[test]
    fn decodes_full_block() {
        let block: RpcBlock = serde_json::from_str(BLOCK).unwrap();
        assert_eq!(block.block_number(), 1_234_567);
        assert_eq!(block.transactions.len(), 2);

        let transactions = block.into_transactions();
        assert_eq!(transactions[0].value, U256::from(1_000_000_000_000_000_000_u64));
        assert_eq!(transactions[0].to, Some(Address::repeat_byte(0xbb)));
        assert!(transactions[0].is_qualifying());
        assert_eq!(transactions[1].to, None);
        assert_eq!(transactions[1].index, 1);
        assert!(!transactions[1].is_qualifying());
    }

    #[test]
    fn missing_optional_fields_fall_back_to_position() {
        let tx: RpcTransaction = serde_json::from_str(
            r#"{
                "hash": "0x3333333333333333333333333333333333333333333333333333333333333333",
                "from": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "value": "0x1"
            }"#,
        )
        .unwrap();
        let tx = tx.into_transaction(9, 4);
        assert_eq!(tx.block_number, 9);
        assert_eq!(tx.index, 4);
        assert_eq!(tx.to, None);
    }

    #[rstest]
    #[case::result(r#"{"jsonrpc":"2.0","id":1,"result":"0x10"}"#, false)]
    #[case::null_result(r#"{"jsonrpc":"2.0","id":1,"result":null}"#, false)]
    #[case::error(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"boom"}}"#, true)]
    fn decodes_response_envelope(#[case] body: &str, #[case] is_error: bool) {
        let response: JsonRpcResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.error.is_some(), is_error);
    }

    #[test]
    fn encodes_request() {
        let request = JsonRpcRequest::new(7, "eth_getBlockByNumber", (U64::from(16), true));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "eth_getBlockByNumber",
                "params": ["0x10", true],
                "id": 7
            })
        );
    }
}
