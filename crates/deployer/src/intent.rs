//! The caller-supplied parameters of a rollup deployment.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Everything the caller decides about a new rollup.
///
/// The remaining fields of the factory call come from the session's
/// [DeployerConfig](crate::DeployerConfig), see
/// [DeployerConfig::deployment_params](crate::DeployerConfig::deployment_params).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentIntent {
    /// Owner of the new rollup.
    pub owner: Address,
    /// Chain id of the new rollup. Also selects the factory in the
    /// [FactoryTable](crate::FactoryTable).
    pub chain_id: u64,
    /// Serialized chain configuration of the new rollup (JSON).
    pub chain_config: String,
    /// Genesis block number of the new rollup.
    pub genesis_block_num: u64,
    /// Receives the stake of validators that lose a challenge.
    pub loser_stake_escrow: Address,
    /// Root of the WASM module used for fraud proofs.
    pub wasm_module_root: B256,
    /// Address allowed to post batches.
    pub batch_poster: Address,
    /// Addresses allowed to validate.
    pub validators: Vec<Address>,
    /// Value attached to the factory call, in wei.
    pub value: U256,
    /// Gas limit of the deployment transaction.
    pub gas_limit: u64,
}
