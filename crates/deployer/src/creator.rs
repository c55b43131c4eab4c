//! The [RollupCreator] session: submits `createRollup` calls and resolves their results.

use crate::{
    bindings::IRollupCreator::{createRollupCall, RollupCreated},
    parse_private_key, wait_for_receipt, AlloyNode, DeployerConfig, DeployerError, DeployerResult,
    DeploymentIntent, NodeError, NodeReceipt, RollupNode, SigningContext, TxParams,
};
use alloy_primitives::{Address, Bytes, B256};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{SolCall, SolEvent};
use core::future::Future;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A deployment session bound to one key and one node.
///
/// The session is created with [RollupCreator::new] (or [RollupCreator::connect] for a JSON-RPC
/// endpoint), which queries the node once for the signer's nonce, the gas price and the chain id.
/// [RollupCreator::request_deployment] then submits a `createRollup` call and
/// [RollupCreator::resolve_deployment] waits for it and decodes the created contract addresses.
///
/// Every remote call, including the initial queries, is raced against the session's
/// [CancellationToken] (see [RollupCreator::new_with_cancellation]). Once the token fires, every
/// in-flight and future operation fails with [DeployerError::Cancelled].
///
/// Submissions from one session are not synchronized: each one queries the node for the pending
/// nonce of the signer, so concurrent [RollupCreator::request_deployment] calls may sign with the
/// same nonce. Serialize them, or use one session per concurrent deployment.
#[derive(Debug)]
pub struct RollupCreator<N> {
    /// The node transactions are submitted to.
    node: N,
    /// Signs deployment transactions.
    signer: SigningContext,
    /// Defaults, factory table and confirmation policy.
    config: DeployerConfig,
    /// Pending nonce of the signer when the session was created.
    initial_nonce: u64,
    /// Aborts remote calls.
    cancel: CancellationToken,
}

impl RollupCreator<AlloyNode> {
    /// Connects to the JSON-RPC endpoint at `node_url` and initializes a session for
    /// `private_key`.
    ///
    /// The key is validated before any connection is attempted.
    pub async fn connect(
        private_key: &str,
        node_url: &str,
        config: DeployerConfig,
    ) -> DeployerResult<Self> {
        Self::connect_with_cancellation(private_key, node_url, config, CancellationToken::new())
            .await
    }

    /// Like [RollupCreator::connect], with the connection and the initial queries raced against
    /// `cancel`. The token becomes the session's token.
    pub async fn connect_with_cancellation(
        private_key: &str,
        node_url: &str,
        config: DeployerConfig,
        cancel: CancellationToken,
    ) -> DeployerResult<Self> {
        let signer = parse_private_key(private_key)?;
        let connect = async {
            AlloyNode::connect(node_url).await.map_err(|e| NodeError::Unreachable(e.to_string()))
        };
        let node = until_cancelled(&cancel, connect).await?;
        Self::init(signer, node, config, cancel).await
    }
}

impl<N: RollupNode> RollupCreator<N> {
    /// Initializes a session for `private_key` on top of `node`.
    pub async fn new(private_key: &str, node: N, config: DeployerConfig) -> DeployerResult<Self> {
        Self::new_with_cancellation(private_key, node, config, CancellationToken::new()).await
    }

    /// Like [RollupCreator::new], with the initial node queries raced against `cancel`. The
    /// token becomes the session's token.
    pub async fn new_with_cancellation(
        private_key: &str,
        node: N,
        config: DeployerConfig,
        cancel: CancellationToken,
    ) -> DeployerResult<Self> {
        let signer = parse_private_key(private_key)?;
        Self::init(signer, node, config, cancel).await
    }

    async fn init(
        signer: PrivateKeySigner,
        node: N,
        config: DeployerConfig,
        cancel: CancellationToken,
    ) -> DeployerResult<Self> {
        let address = signer.address();
        let nonce = until_cancelled(&cancel, node.pending_nonce(address)).await?;
        let gas_price = until_cancelled(&cancel, node.gas_price()).await?;
        let chain_id = until_cancelled(&cancel, node.chain_id()).await?;
        info!(
            target: "rollup_creator",
            "Initialized deployer {address} on chain {chain_id} (nonce: {nonce}, gas price: {})",
            gas_price
        );

        let signer = SigningContext::new(signer, chain_id, gas_price, config.gas_limit.0);
        Ok(Self { node, signer, config, initial_nonce: nonce, cancel })
    }

    /// Replaces the session's cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the address deployments are sent from.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Returns the chain id reported by the node.
    pub const fn chain_id(&self) -> u64 {
        self.signer.chain_id()
    }

    /// Returns the gas price deployments are signed with.
    pub const fn gas_price(&self) -> u128 {
        self.signer.gas_price()
    }

    /// Returns the pending nonce of the signer when the session was created.
    pub const fn initial_nonce(&self) -> u64 {
        self.initial_nonce
    }

    /// Returns the session configuration.
    pub const fn config(&self) -> &DeployerConfig {
        &self.config
    }

    /// Returns the node the session talks to.
    pub const fn node(&self) -> &N {
        &self.node
    }

    /// Returns the session's cancellation token.
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Submits a `createRollup` call for `intent`.
    ///
    /// The call is sent to the factory registered for `intent.chain_id`, signed with the current
    /// pending nonce of the signer. The returned handle only proves submission; use
    /// [RollupCreator::resolve_deployment] to wait for the transaction to be mined.
    pub async fn request_deployment(
        &self,
        intent: &DeploymentIntent,
    ) -> DeployerResult<PendingDeployment> {
        let factory = self.factory(intent.chain_id)?;
        let call = createRollupCall { deployParams: self.config.deployment_params(intent) };
        let input = Bytes::from(call.abi_encode());

        let nonce = self.cancellable(self.node.pending_nonce(self.address())).await?;
        let params = TxParams { nonce, value: intent.value, gas_limit: intent.gas_limit };
        let signed = self.signer.sign(factory, input, params)?;
        debug!(
            target: "rollup_creator",
            "Signed createRollup for chain {} (nonce: {nonce}, tx: {})",
            intent.chain_id,
            signed.hash
        );

        let tx_hash = match self.cancellable(self.node.send_raw_transaction(signed.raw)).await {
            Err(DeployerError::Cancelled) => {
                warn!(
                    target: "rollup_creator",
                    "Cancelled while submitting {} (nonce: {nonce}), it may still be broadcast",
                    signed.hash
                );
                return Err(DeployerError::Cancelled);
            }
            res => res?,
        };
        if tx_hash != signed.hash {
            warn!(
                target: "rollup_creator",
                "Node reported hash {tx_hash}, expected {}", signed.hash
            );
        }
        info!(
            target: "rollup_creator",
            "Submitted createRollup for chain {} to factory {factory}: {tx_hash}", intent.chain_id
        );

        Ok(PendingDeployment { tx_hash, nonce, chain_id: intent.chain_id, factory })
    }

    /// Waits for `pending` to be mined and decodes the contracts it created.
    ///
    /// `chain_id` selects the factory whose `RollupCreated` event is decoded. The last log
    /// emitted by that factory with the `RollupCreated` signature is used, so logs from other
    /// contracts in the same transaction are ignored.
    pub async fn resolve_deployment(
        &self,
        chain_id: u64,
        pending: &PendingDeployment,
    ) -> DeployerResult<RollupDeployment> {
        let factory = self.factory(chain_id)?;
        let receipt =
            wait_for_receipt(&self.node, pending.tx_hash, &self.config.confirmation, &self.cancel)
                .await?;
        if !receipt.status {
            return Err(DeployerError::Reverted(pending.tx_hash));
        }

        let contracts = RollupContracts::from_receipt(&receipt, factory)?;
        info!(
            target: "rollup_creator",
            "Rollup for chain {chain_id} deployed at {} (tx: {})",
            contracts.rollup,
            pending.tx_hash
        );

        Ok(RollupDeployment {
            tx_hash: pending.tx_hash,
            block_number: receipt.block_number,
            contracts,
            receipt,
        })
    }

    /// Submits a deployment for `intent` and waits for its result.
    pub async fn deploy(&self, intent: &DeploymentIntent) -> DeployerResult<RollupDeployment> {
        let pending = self.request_deployment(intent).await?;
        self.resolve_deployment(intent.chain_id, &pending).await
    }

    fn factory(&self, chain_id: u64) -> DeployerResult<Address> {
        self.config.factories.get(chain_id).ok_or(DeployerError::UnknownChain(chain_id))
    }

    async fn cancellable<T>(
        &self,
        fut: impl Future<Output = Result<T, NodeError>>,
    ) -> DeployerResult<T> {
        until_cancelled(&self.cancel, fut).await
    }
}

/// Races `fut` against `cancel`.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T, NodeError>>,
) -> DeployerResult<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DeployerError::Cancelled),
        res = fut => res.map_err(Into::into),
    }
}

/// A submitted, not yet confirmed, deployment transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingDeployment {
    /// Hash of the deployment transaction.
    pub tx_hash: B256,
    /// Nonce the transaction was signed with.
    pub nonce: u64,
    /// Chain id of the rollup being deployed.
    pub chain_id: u64,
    /// The factory the transaction calls.
    pub factory: Address,
}

/// A mined deployment and the contracts it created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupDeployment {
    /// Hash of the deployment transaction.
    pub tx_hash: B256,
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    /// Addresses of the new rollup's contracts.
    pub contracts: RollupContracts,
    /// The receipt of the deployment transaction.
    pub receipt: NodeReceipt,
}

/// The contracts deployed for a new rollup, as reported by the `RollupCreated` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupContracts {
    /// The rollup proxy.
    pub rollup: Address,
    /// Gas token of the rollup. The zero address means ETH.
    pub native_token: Address,
    /// The delayed inbox.
    pub inbox: Address,
    /// The outbox.
    pub outbox: Address,
    /// The rollup event inbox.
    pub rollup_event_inbox: Address,
    /// The challenge manager.
    pub challenge_manager: Address,
    /// The proxy admin.
    pub admin_proxy: Address,
    /// The sequencer inbox.
    pub sequencer_inbox: Address,
    /// The bridge.
    pub bridge: Address,
    /// The upgrade executor.
    pub upgrade_executor: Address,
    /// The validator utils.
    pub validator_utils: Address,
    /// The validator wallet creator.
    pub validator_wallet_creator: Address,
}

impl RollupContracts {
    /// Decodes the `RollupCreated` event that `factory` emitted in `receipt`.
    pub fn from_receipt(receipt: &NodeReceipt, factory: Address) -> DeployerResult<Self> {
        let log = receipt
            .logs
            .iter()
            .rev()
            .find(|log| {
                log.address == factory &&
                    log.data.topics().first() == Some(&RollupCreated::SIGNATURE_HASH)
            })
            .ok_or_else(|| {
                DeployerError::Decode(format!(
                    "no RollupCreated log from {factory} among {} log(s) of {}",
                    receipt.logs.len(),
                    receipt.transaction_hash
                ))
            })?;

        RollupCreated::decode_log_data(&log.data)
            .map(Into::into)
            .map_err(|e| DeployerError::Decode(e.to_string()))
    }
}

impl From<RollupCreated> for RollupContracts {
    fn from(event: RollupCreated) -> Self {
        Self {
            rollup: event.rollupAddress,
            native_token: event.nativeToken,
            inbox: event.inboxAddress,
            outbox: event.outbox,
            rollup_event_inbox: event.rollupEventInbox,
            challenge_manager: event.challengeManager,
            admin_proxy: event.adminProxy,
            sequencer_inbox: event.sequencerInbox,
            bridge: event.bridge,
            upgrade_executor: event.upgradeExecutor,
            validator_utils: event.validatorUtils,
            validator_wallet_creator: event.validatorWalletCreator,
        }
    }
}
