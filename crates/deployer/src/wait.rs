//! Waiting for a submitted transaction to be mined.

use crate::{DeployerError, DeployerResult, NodeReceipt, RollupNode};
use alloy_primitives::B256;
use backon::{BackoffBuilder, ExponentialBuilder};
use core::time::Duration;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// How long, and how often, to poll for a transaction receipt.
///
/// The poll interval starts at `poll_interval_ms` and grows by `backoff_factor` after every miss,
/// capped at `max_poll_interval_ms`. The whole wait is bounded by `timeout_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfirmationPolicy {
    /// First delay between two receipt queries, in milliseconds.
    pub poll_interval_ms: u64,
    /// Largest delay between two receipt queries, in milliseconds.
    pub max_poll_interval_ms: u64,
    /// Multiplier applied to the delay after every miss.
    pub backoff_factor: u32,
    /// Deadline for the whole wait, in seconds.
    pub timeout_secs: u64,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            max_poll_interval_ms: 12_000,
            backoff_factor: 2,
            timeout_secs: 600,
        }
    }
}

impl ConfirmationPolicy {
    /// Returns the deadline of the wait.
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the largest delay between two receipt queries.
    pub const fn max_poll_interval(&self) -> Duration {
        Duration::from_millis(self.max_poll_interval_ms)
    }

    /// Returns the delays between successive receipt queries.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(self.poll_interval_ms))
            .with_max_delay(self.max_poll_interval())
            .with_factor(self.backoff_factor.max(1) as f32)
            .without_max_times()
            .build()
    }
}

/// Polls `node` until the transaction `hash` has a receipt.
///
/// Fails with [DeployerError::Timeout] once the policy deadline passes, with
/// [DeployerError::Cancelled] as soon as `cancel` fires, and with [DeployerError::Receipt] if the
/// node fails to answer a receipt query.
pub async fn wait_for_receipt<N: RollupNode + ?Sized>(
    node: &N,
    hash: B256,
    policy: &ConfirmationPolicy,
    cancel: &CancellationToken,
) -> DeployerResult<NodeReceipt> {
    let poll = async {
        let mut delays = policy.delays();
        let mut attempts = 0u64;
        loop {
            attempts += 1;
            match node.transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    debug!(target: "confirmation", "Transaction {hash} mined, polls: {attempts}");
                    return Ok(receipt);
                }
                Ok(None) => trace!(target: "confirmation", "Transaction {hash} still pending"),
                Err(e) => return Err(DeployerError::Receipt(e.to_string())),
            }
            let delay = delays.next().unwrap_or_else(|| policy.max_poll_interval());
            tokio::time::sleep(delay).await;
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!(target: "confirmation", "Wait for transaction {hash} cancelled");
            Err(DeployerError::Cancelled)
        }
        res = tokio::time::timeout(policy.timeout(), poll) => {
            res.unwrap_or_else(|_| {
                let timeout = policy.timeout();
                warn!(target: "confirmation", "Transaction {hash} not mined within {timeout:?}");
                Err(DeployerError::Timeout(timeout))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockNode;

    fn fast_policy() -> ConfirmationPolicy {
        ConfirmationPolicy {
            poll_interval_ms: 10,
            max_poll_interval_ms: 40,
            backoff_factor: 2,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_delays_back_off_to_cap() {
        let delays: Vec<_> = fast_policy().delays().take(5).collect();
        assert_eq!(delays.len(), 5);
        assert_eq!(delays[0], Duration::from_millis(10));
        assert!(delays[1] > delays[0]);
        assert!(delays.iter().all(|d| *d <= Duration::from_millis(40)));
        assert_eq!(delays[4], Duration::from_millis(40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_returns_mined_receipt() {
        let node = MockNode::new(1);
        let hash = B256::repeat_byte(0x01);
        let receipt = NodeReceipt { transaction_hash: hash, status: true, ..Default::default() };
        node.mine_after(hash, receipt, 3);

        let receipt =
            wait_for_receipt(&node, hash, &fast_policy(), &CancellationToken::new()).await.unwrap();
        assert_eq!(receipt.transaction_hash, hash);
        assert_eq!(node.receipt_queries(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out() {
        let node = MockNode::new(1);
        let err = wait_for_receipt(&node, B256::ZERO, &fast_policy(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, DeployerError::Timeout(Duration::from_secs(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_cancelled() {
        let node = MockNode::new(1);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let err = wait_for_receipt(&node, B256::ZERO, &fast_policy(), &cancel).await.unwrap_err();
        assert_eq!(err, DeployerError::Cancelled);
    }

    #[tokio::test]
    async fn test_wait_surfaces_receipt_errors() {
        let node = MockNode::new(1);
        node.fail_receipts("header not found");
        let err = wait_for_receipt(&node, B256::ZERO, &fast_policy(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DeployerError::Receipt(msg) if msg.contains("header not found")));
    }
}
