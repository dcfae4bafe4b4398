//! Minimal HTTP JSON-RPC client.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use alloy_primitives::U64;
use serde::{Serialize, de::DeserializeOwned};
use tracing::trace;
use txscope_primitives::BlockNumber;

use crate::{JsonRpcRequest, JsonRpcResponse, RpcBlock, RpcClientError, RpcSourceConfig};

/// HTTP client for the handful of `eth_` calls the viewer needs.
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: reqwest::Client,
    url: String,
    ids: Arc<AtomicU64>,
}

impl RpcClient {
    /// Builds a client for the endpoint in `config`.
    pub fn new(config: &RpcSourceConfig) -> Result<Self, RpcClientError> {
        let client = reqwest::Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, url: config.url.clone(), ids: Arc::new(AtomicU64::new(1)) })
    }

    /// The endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends a JSON-RPC call and decodes its result.
    pub async fn request<P, R>(&self, method: &str, params: P) -> Result<R, RpcClientError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let id = self.ids.fetch_add(1, Ordering::Relaxed);
        trace!(id, method, "rpc request");

        let body = JsonRpcRequest::new(id, method, params);
        let bytes = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let response: JsonRpcResponse = serde_json::from_slice(&bytes)?;
        if let Some(error) = response.error {
            return Err(RpcClientError::Rpc { code: error.code, message: error.message });
        }
        Ok(serde_json::from_value(response.result)?)
    }

    /// `eth_blockNumber`.
    pub async fn block_number(&self) -> Result<BlockNumber, RpcClientError> {
        let head: U64 = self.request("eth_blockNumber", [(); 0]).await?;
        Ok(head.to::<u64>())
    }

    /// `eth_getBlockByNumber` with full transaction objects. `None` when the node does
    /// not know the block.
    pub async fn block_by_number(
        &self,
        number: BlockNumber,
    ) -> Result<Option<RpcBlock>, RpcClientError> {
        self.request("eth_getBlockByNumber", (U64::from(number), true)).await
    }
}
