//! This module defines the [RollupNode] trait.

use crate::NodeError;
use alloy_primitives::{Address, Bytes, Log, B256};
use async_trait::async_trait;
use std::sync::Arc;

/// The JSON-RPC surface of a node that the deployer needs.
#[async_trait]
pub trait RollupNode: Send + Sync {
    /// Returns the nonce of `address`, including transactions still in the mempool.
    async fn pending_nonce(&self, address: Address) -> Result<u64, NodeError>;

    /// Returns the node's suggested legacy gas price, in wei.
    async fn gas_price(&self) -> Result<u128, NodeError>;

    /// Returns the chain id the node serves.
    async fn chain_id(&self) -> Result<u64, NodeError>;

    /// Submits an EIP-2718 encoded, signed transaction and returns its hash.
    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256, NodeError>;

    /// Returns the receipt of the transaction with the given hash, or [None] if it has not
    /// been mined yet.
    async fn transaction_receipt(&self, hash: B256) -> Result<Option<NodeReceipt>, NodeError>;
}

#[async_trait]
impl<N: RollupNode + ?Sized> RollupNode for Arc<N> {
    async fn pending_nonce(&self, address: Address) -> Result<u64, NodeError> {
        (**self).pending_nonce(address).await
    }

    async fn gas_price(&self) -> Result<u128, NodeError> {
        (**self).gas_price().await
    }

    async fn chain_id(&self) -> Result<u64, NodeError> {
        (**self).chain_id().await
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256, NodeError> {
        (**self).send_raw_transaction(raw).await
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<NodeReceipt>, NodeError> {
        (**self).transaction_receipt(hash).await
    }
}

/// The parts of a mined transaction receipt the deployer reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeReceipt {
    /// Hash of the transaction.
    pub transaction_hash: B256,
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    /// `true` if the transaction succeeded.
    pub status: bool,
    /// Gas consumed by the transaction.
    pub gas_used: u64,
    /// Logs emitted by the transaction, in order.
    pub logs: Vec<Log>,
}
