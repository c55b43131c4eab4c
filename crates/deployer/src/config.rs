//! Configuration for a [RollupCreator](crate::RollupCreator) session.
//!
//! Every value the factory call needs but the caller does not supply lives here. The config is
//! built once, handed to the session at initialization, and never mutated afterwards.

use crate::{
    bindings::{Config, MaxTimeVariation, RollupDeploymentParams},
    ConfirmationPolicy, DeploymentIntent, FactoryTable,
};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Gas limit placeholder used by the signing context until a request overrides it.
pub const DEFAULT_GAS_LIMIT: u64 = 9_268_689;

/// 0.1 ETH, in wei.
const DEFAULT_BASE_STAKE: u128 = 100_000_000_000_000_000;

/// 0.1 gwei, in wei.
const DEFAULT_MAX_FEE_PER_GAS_FOR_RETRYABLES: u128 = 100_000_000;

/// The full configuration of a deployer session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeployerConfig {
    /// Defaults for the rollup configuration record.
    pub rollup: RollupDefaults,
    /// Defaults for the remaining deployment parameters.
    pub deployment: DeploymentDefaults,
    /// Gas limit the signing context starts out with.
    pub gas_limit: GasLimit,
    /// How to wait for a deployment transaction to be mined.
    pub confirmation: ConfirmationPolicy,
    /// Known `RollupCreator` addresses, by chain id.
    pub factories: FactoryTable,
}

impl DeployerConfig {
    /// Merges `intent` with the configured defaults into the argument of `createRollup`.
    pub fn deployment_params(&self, intent: &DeploymentIntent) -> RollupDeploymentParams {
        let config = Config {
            confirmPeriodBlocks: self.rollup.confirm_period_blocks,
            extraChallengeTimeBlocks: self.rollup.extra_challenge_time_blocks,
            stakeToken: self.rollup.stake_token,
            baseStake: self.rollup.base_stake,
            wasmModuleRoot: intent.wasm_module_root,
            owner: intent.owner,
            loserStakeEscrow: intent.loser_stake_escrow,
            chainId: U256::from(intent.chain_id),
            chainConfig: intent.chain_config.clone(),
            genesisBlockNum: intent.genesis_block_num,
            sequencerInboxMaxTimeVariation: self
                .rollup
                .sequencer_inbox_max_time_variation
                .clone()
                .into(),
        };

        RollupDeploymentParams {
            config,
            batchPoster: intent.batch_poster,
            validators: intent.validators.clone(),
            maxDataSize: self.deployment.max_data_size,
            nativeToken: self.deployment.native_token,
            deployFactoriesToL2: self.deployment.deploy_factories_to_l2,
            maxFeePerGasForRetryables: self.deployment.max_fee_per_gas_for_retryables,
        }
    }
}

/// A gas limit with a non-zero default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GasLimit(pub u64);

impl Default for GasLimit {
    fn default() -> Self {
        Self(DEFAULT_GAS_LIMIT)
    }
}

/// Defaults for the rollup configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RollupDefaults {
    /// Blocks an assertion must wait before it can be confirmed.
    pub confirm_period_blocks: u64,
    /// Extra blocks added to the challenge period.
    pub extra_challenge_time_blocks: u64,
    /// Token validators stake in. The zero address means the native currency.
    pub stake_token: Address,
    /// Amount a validator must stake.
    pub base_stake: U256,
    /// Sequencer inbox timing bounds.
    pub sequencer_inbox_max_time_variation: SequencerInboxTiming,
}

impl Default for RollupDefaults {
    fn default() -> Self {
        Self {
            confirm_period_blocks: 150,
            extra_challenge_time_blocks: 0,
            stake_token: Address::ZERO,
            base_stake: U256::from(DEFAULT_BASE_STAKE),
            sequencer_inbox_max_time_variation: SequencerInboxTiming::default(),
        }
    }
}

/// Bounds on how far sequencer inbox messages may drift from the parent chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SequencerInboxTiming {
    /// How many blocks a message may lag behind.
    pub delay_blocks: U256,
    /// How many blocks a message may run ahead.
    pub future_blocks: U256,
    /// How many seconds a message may lag behind.
    pub delay_seconds: U256,
    /// How many seconds a message may run ahead.
    pub future_seconds: U256,
}

impl Default for SequencerInboxTiming {
    fn default() -> Self {
        Self {
            delay_blocks: U256::from(5760),
            future_blocks: U256::from(48),
            delay_seconds: U256::from(86400),
            future_seconds: U256::from(3600),
        }
    }
}

impl From<SequencerInboxTiming> for MaxTimeVariation {
    fn from(timing: SequencerInboxTiming) -> Self {
        Self {
            delayBlocks: timing.delay_blocks,
            futureBlocks: timing.future_blocks,
            delaySeconds: timing.delay_seconds,
            futureSeconds: timing.future_seconds,
        }
    }
}

/// Defaults for the deployment parameters outside the rollup configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeploymentDefaults {
    /// Largest batch the sequencer inbox accepts, in bytes.
    pub max_data_size: U256,
    /// Custom gas token of the rollup. The zero address means ETH.
    pub native_token: Address,
    /// Whether the factory also deploys the token bridge creator contracts on the new chain.
    pub deploy_factories_to_l2: bool,
    /// Max fee per gas paid for the retryables that deploy the L2 factories.
    pub max_fee_per_gas_for_retryables: U256,
}

impl Default for DeploymentDefaults {
    fn default() -> Self {
        Self {
            max_data_size: U256::from(104_857),
            native_token: Address::ZERO,
            deploy_factories_to_l2: true,
            max_fee_per_gas_for_retryables: U256::from(DEFAULT_MAX_FEE_PER_GAS_FOR_RETRYABLES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;

    fn intent() -> DeploymentIntent {
        DeploymentIntent {
            owner: Address::repeat_byte(0xaa),
            chain_id: 999,
            chain_config: r#"{"chainId":999}"#.to_string(),
            genesis_block_num: 7,
            loser_stake_escrow: Address::repeat_byte(0xee),
            wasm_module_root: B256::repeat_byte(0x11),
            batch_poster: Address::repeat_byte(0xbb),
            validators: vec![Address::repeat_byte(0xcc)],
            value: U256::ZERO,
            gas_limit: 5_000_000,
        }
    }

    #[test]
    fn test_deployment_params_merge() {
        let cfg = DeployerConfig::default();
        let params = cfg.deployment_params(&intent());

        assert_eq!(params.config.confirmPeriodBlocks, 150);
        assert_eq!(params.config.extraChallengeTimeBlocks, 0);
        assert_eq!(params.config.stakeToken, Address::ZERO);
        assert_eq!(params.config.baseStake, U256::from(DEFAULT_BASE_STAKE));
        assert_eq!(params.config.owner, Address::repeat_byte(0xaa));
        assert_eq!(params.config.loserStakeEscrow, Address::repeat_byte(0xee));
        assert_eq!(params.config.chainId, U256::from(999));
        assert_eq!(params.config.chainConfig, r#"{"chainId":999}"#);
        assert_eq!(params.config.genesisBlockNum, 7);
        assert_eq!(params.config.wasmModuleRoot, B256::repeat_byte(0x11));
        assert_eq!(params.config.sequencerInboxMaxTimeVariation.delayBlocks, U256::from(5760));
        assert_eq!(params.config.sequencerInboxMaxTimeVariation.futureSeconds, U256::from(3600));
        assert_eq!(params.batchPoster, Address::repeat_byte(0xbb));
        assert_eq!(params.validators, vec![Address::repeat_byte(0xcc)]);
        assert_eq!(params.maxDataSize, U256::from(104_857));
        assert_eq!(params.nativeToken, Address::ZERO);
        assert!(params.deployFactoriesToL2);
        assert_eq!(params.maxFeePerGasForRetryables, U256::from(100_000_000));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "rollup": { "confirmPeriodBlocks": 20 },
            "gasLimit": 12000000,
            "factories": { "999": "0x4242424242424242424242424242424242424242" }
        }"#;
        let cfg: DeployerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(cfg.rollup.confirm_period_blocks, 20);
        assert_eq!(cfg.rollup.base_stake, U256::from(DEFAULT_BASE_STAKE));
        assert_eq!(cfg.gas_limit, GasLimit(12_000_000));
        assert_eq!(cfg.deployment, DeploymentDefaults::default());
        assert_eq!(cfg.confirmation, ConfirmationPolicy::default());
        assert_eq!(cfg.factories.get(999), Some(Address::repeat_byte(0x42)));
        assert_eq!(cfg.factories.get(42161), None);
    }

    #[test]
    fn test_default_gas_limit() {
        assert_eq!(DeployerConfig::default().gas_limit.0, DEFAULT_GAS_LIMIT);
    }
}
