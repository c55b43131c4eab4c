//! A [RollupNode] that uses an alloy provider on the backend.

use crate::{NodeError, NodeReceipt, RollupNode};
use alloy_network::Ethereum;
use alloy_primitives::{Address, Bytes, B256};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types_eth::TransactionReceipt;
use async_trait::async_trait;
use tracing::{debug, trace};

/// The [AlloyNode] is a concrete implementation of the [RollupNode] trait, talking Ethereum
/// JSON-RPC through an alloy [RootProvider].
#[derive(Debug, Clone)]
pub struct AlloyNode {
    /// The inner Ethereum JSON-RPC provider.
    inner: RootProvider<Ethereum>,
}

impl AlloyNode {
    /// Creates a new [AlloyNode] with the given alloy provider.
    pub const fn new(inner: RootProvider<Ethereum>) -> Self {
        Self { inner }
    }

    /// Connects to the node at `url`. HTTP(S) and WS(S) endpoints are supported.
    ///
    /// HTTP endpoints are connected lazily, so an unreachable HTTP node only surfaces on the
    /// first request.
    pub async fn connect(url: &str) -> Result<Self, NodeError> {
        debug!(target: "alloy_node", "Connecting to node at {url}");
        let client = RpcClient::builder().connect(url).await?;
        Ok(Self::new(RootProvider::new(client)))
    }

    /// Returns the inner provider.
    pub const fn provider(&self) -> &RootProvider<Ethereum> {
        &self.inner
    }
}

#[async_trait]
impl RollupNode for AlloyNode {
    async fn pending_nonce(&self, address: Address) -> Result<u64, NodeError> {
        Ok(self.inner.get_transaction_count(address).pending().await?)
    }

    async fn gas_price(&self) -> Result<u128, NodeError> {
        Ok(self.inner.get_gas_price().await?)
    }

    async fn chain_id(&self) -> Result<u64, NodeError> {
        Ok(self.inner.get_chain_id().await?)
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256, NodeError> {
        let pending = self.inner.send_raw_transaction(&raw).await?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<NodeReceipt>, NodeError> {
        let receipt = self.inner.get_transaction_receipt(hash).await?;
        trace!(target: "alloy_node", "Receipt for {hash}: found = {}", receipt.is_some());
        Ok(receipt.map(Into::into))
    }
}

impl From<TransactionReceipt> for NodeReceipt {
    fn from(receipt: TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            status: receipt.status(),
            gas_used: receipt.gas_used,
            logs: receipt.inner.logs().iter().map(|log| log.inner.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_node() {
        // Nothing listens on the discard port.
        let node = AlloyNode::connect("http://127.0.0.1:9").await.unwrap();
        let err = node.chain_id().await.unwrap_err();
        assert!(matches!(err, NodeError::Unreachable(_)), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn test_invalid_endpoint() {
        let err = AlloyNode::connect("not a url").await.unwrap_err();
        assert!(matches!(err, NodeError::Unreachable(_)), "unexpected error: {err:?}");
    }
}
