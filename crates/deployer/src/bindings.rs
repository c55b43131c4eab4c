//! Contract bindings for the Orbit `RollupCreator` factory via `alloy_sol_types::sol!`.
//!
//! Only the deployment entry point and its creation event are included.

use alloy_sol_types::sol;

sol! {
    /// Bounds on how far sequencer inbox messages may drift from the parent chain.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct MaxTimeVariation {
        uint256 delayBlocks;
        uint256 futureBlocks;
        uint256 delaySeconds;
        uint256 futureSeconds;
    }

    /// The rollup configuration record passed to the factory.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct Config {
        uint64 confirmPeriodBlocks;
        uint64 extraChallengeTimeBlocks;
        address stakeToken;
        uint256 baseStake;
        bytes32 wasmModuleRoot;
        address owner;
        address loserStakeEscrow;
        uint256 chainId;
        string chainConfig;
        uint64 genesisBlockNum;
        MaxTimeVariation sequencerInboxMaxTimeVariation;
    }

    /// The full argument of `createRollup`.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct RollupDeploymentParams {
        Config config;
        address batchPoster;
        address[] validators;
        uint256 maxDataSize;
        address nativeToken;
        bool deployFactoriesToL2;
        uint256 maxFeePerGasForRetryables;
    }

    /// The subset of the `RollupCreator` interface used by the deployer.
    interface IRollupCreator {
        /// Emitted once the rollup contract set has been deployed.
        #[derive(Debug, PartialEq, Eq)]
        event RollupCreated(
            address indexed rollupAddress,
            address indexed nativeToken,
            address inboxAddress,
            address outbox,
            address rollupEventInbox,
            address challengeManager,
            address adminProxy,
            address sequencerInbox,
            address bridge,
            address upgradeExecutor,
            address validatorUtils,
            address validatorWalletCreator
        );

        function createRollup(RollupDeploymentParams memory deployParams)
            external
            payable
            returns (address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256, U256};
    use alloy_sol_types::{SolCall, SolEvent};

    #[test]
    fn test_create_rollup_signature() {
        assert_eq!(
            IRollupCreator::createRollupCall::SIGNATURE,
            "createRollup(((uint64,uint64,address,uint256,bytes32,address,address,uint256,string,\
             uint64,(uint256,uint256,uint256,uint256)),address,address[],uint256,address,bool,\
             uint256))"
        );
    }

    #[test]
    fn test_rollup_created_signature() {
        assert_eq!(
            IRollupCreator::RollupCreated::SIGNATURE,
            "RollupCreated(address,address,address,address,address,address,address,address,\
             address,address,address,address)"
        );
    }

    #[test]
    fn test_create_rollup_calldata_selector() {
        let call = IRollupCreator::createRollupCall {
            deployParams: RollupDeploymentParams {
                config: Config {
                    chainId: U256::from(999),
                    chainConfig: "{}".to_string(),
                    wasmModuleRoot: B256::repeat_byte(0x11),
                    ..Default::default()
                },
                validators: vec![Address::repeat_byte(0xcc)],
                deployFactoriesToL2: true,
                ..Default::default()
            },
        };
        let calldata = call.abi_encode();
        assert_eq!(&calldata[..4], IRollupCreator::createRollupCall::SELECTOR.as_slice());
        assert_eq!(calldata.len() % 32, 4);
    }
}
