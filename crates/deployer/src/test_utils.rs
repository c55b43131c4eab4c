//! Test utilities for the deployer.

use crate::{NodeError, NodeReceipt, RollupNode};
use alloy_consensus::{Transaction, TxEnvelope};
use alloy_eips::eip2718::Decodable2718;
use alloy_primitives::{Address, Bytes, Log, B256};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

/// An in-memory [RollupNode] for testing.
///
/// The node accepts signed transactions, tracks the pending nonce of the sender, and can be told
/// to mine submitted transactions immediately with a fixed set of logs.
#[derive(Debug, Clone, Default)]
pub struct MockNode {
    state: Arc<Mutex<MockNodeState>>,
}

#[derive(Debug, Default)]
struct MockNodeState {
    chain_id: u64,
    gas_price: u128,
    nonce: u64,
    unreachable: bool,
    failing_receipts: Option<String>,
    failing_chain_id: Option<String>,
    rejected_submissions: Option<String>,
    hang_chain_id: bool,
    hang_submissions: bool,
    auto_mine: Option<(bool, Vec<Log>)>,
    pending: HashMap<B256, (usize, NodeReceipt)>,
    sent: Vec<TxEnvelope>,
    nonce_queries: usize,
    receipt_queries: usize,
}

impl MockNode {
    /// Creates a mock node serving `chain_id`, with a gas price of 1 gwei.
    pub fn new(chain_id: u64) -> Self {
        let node = Self::default();
        {
            let mut state = node.state();
            state.chain_id = chain_id;
            state.gas_price = 1_000_000_000;
        }
        node
    }

    fn state(&self) -> MutexGuard<'_, MockNodeState> {
        self.state.lock().unwrap()
    }

    /// Sets the pending nonce reported for the sender.
    pub fn set_nonce(&self, nonce: u64) {
        self.state().nonce = nonce;
    }

    /// Sets the suggested gas price.
    pub fn set_gas_price(&self, gas_price: u128) {
        self.state().gas_price = gas_price;
    }

    /// Makes every request fail as if the node could not be reached.
    pub fn set_unreachable(&self) {
        self.state().unreachable = true;
    }

    /// Makes every receipt query fail with `message`.
    pub fn fail_receipts(&self, message: &str) {
        self.state().failing_receipts = Some(message.to_string());
    }

    /// Makes every chain id query fail with `message`.
    pub fn fail_chain_id(&self, message: &str) {
        self.state().failing_chain_id = Some(message.to_string());
    }

    /// Makes every submission fail with `message`.
    pub fn reject_submissions(&self, message: &str) {
        self.state().rejected_submissions = Some(message.to_string());
    }

    /// Makes chain id queries never return.
    pub fn hang_chain_id(&self) {
        self.state().hang_chain_id = true;
    }

    /// Makes submissions never return. Submitted transactions are still recorded.
    pub fn hang_submissions(&self) {
        self.state().hang_submissions = true;
    }

    /// Mines every transaction submitted from now on, emitting `logs`.
    pub fn mine_with_logs(&self, logs: Vec<Log>) {
        self.state().auto_mine = Some((true, logs));
    }

    /// Mines every transaction submitted from now on as reverted.
    pub fn mine_reverted(&self) {
        self.state().auto_mine = Some((false, Vec::new()));
    }

    /// Returns `receipt` for `hash` once `misses` receipt queries for it have come back empty.
    pub fn mine_after(&self, hash: B256, receipt: NodeReceipt, misses: usize) {
        self.state().pending.insert(hash, (misses, receipt));
    }

    /// Returns the transactions submitted so far, in order.
    pub fn sent(&self) -> Vec<TxEnvelope> {
        self.state().sent.clone()
    }

    /// Returns how often the pending nonce was queried.
    pub fn nonce_queries(&self) -> usize {
        self.state().nonce_queries
    }

    /// Returns how often a receipt was queried.
    pub fn receipt_queries(&self) -> usize {
        self.state().receipt_queries
    }

    /// Validates and records a submission, returning its hash and whether the node hangs.
    fn submit(&self, raw: Bytes) -> Result<(B256, bool), NodeError> {
        let mut state = self.state();
        if state.unreachable {
            return Err(NodeError::Unreachable("connection refused".to_string()));
        }
        if let Some(message) = &state.rejected_submissions {
            return Err(NodeError::Rpc(message.clone()));
        }

        let envelope = TxEnvelope::decode_2718(&mut raw.as_ref())
            .map_err(|e| NodeError::Rpc(format!("rlp: {e}")))?;
        if envelope.nonce() != state.nonce {
            return Err(NodeError::Rpc(format!(
                "invalid nonce: expected {}, got {}",
                state.nonce,
                envelope.nonce()
            )));
        }

        let hash = *envelope.tx_hash();
        state.nonce += 1;
        state.sent.push(envelope);
        if let Some((status, logs)) = state.auto_mine.clone() {
            let block_number = state.sent.len() as u64;
            let receipt = NodeReceipt {
                transaction_hash: hash,
                block_number: Some(block_number),
                status,
                gas_used: 21_000,
                logs,
            };
            state.pending.insert(hash, (0, receipt));
        }
        Ok((hash, state.hang_submissions))
    }
}

#[async_trait]
impl RollupNode for MockNode {
    async fn pending_nonce(&self, _: Address) -> Result<u64, NodeError> {
        let mut state = self.state();
        if state.unreachable {
            return Err(NodeError::Unreachable("connection refused".to_string()));
        }
        state.nonce_queries += 1;
        Ok(state.nonce)
    }

    async fn gas_price(&self) -> Result<u128, NodeError> {
        let state = self.state();
        if state.unreachable {
            return Err(NodeError::Unreachable("connection refused".to_string()));
        }
        Ok(state.gas_price)
    }

    async fn chain_id(&self) -> Result<u64, NodeError> {
        let hang = self.state().hang_chain_id;
        if hang {
            std::future::pending::<()>().await;
        }

        let state = self.state();
        if state.unreachable {
            return Err(NodeError::Unreachable("connection refused".to_string()));
        }
        if let Some(message) = &state.failing_chain_id {
            return Err(NodeError::Rpc(message.clone()));
        }
        Ok(state.chain_id)
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256, NodeError> {
        let (hash, hang) = self.submit(raw)?;
        if hang {
            std::future::pending::<()>().await;
        }
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<NodeReceipt>, NodeError> {
        let mut state = self.state();
        state.receipt_queries += 1;
        if let Some(message) = &state.failing_receipts {
            return Err(NodeError::Rpc(message.clone()));
        }
        match state.pending.get_mut(&hash) {
            Some((0, receipt)) => Ok(Some(receipt.clone())),
            Some((misses, _)) => {
                *misses -= 1;
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
