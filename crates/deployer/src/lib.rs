#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub mod bindings;

mod errors;
pub use errors::{DeployerError, DeployerResult, NodeError};

mod factories;
pub use factories::{
    FactoryTable, ARBITRUM_NOVA_ROLLUP_CREATOR, ARBITRUM_ONE_ROLLUP_CREATOR,
    ARBITRUM_SEPOLIA_ROLLUP_CREATOR, BASE_ROLLUP_CREATOR, BASE_SEPOLIA_ROLLUP_CREATOR,
    HOLESKY_ROLLUP_CREATOR, MAINNET_ROLLUP_CREATOR, NITRO_TESTNODE_L1_ROLLUP_CREATOR,
    NITRO_TESTNODE_L2_ROLLUP_CREATOR, SEPOLIA_ROLLUP_CREATOR,
};

mod config;
pub use config::{
    DeployerConfig, DeploymentDefaults, GasLimit, RollupDefaults, SequencerInboxTiming,
    DEFAULT_GAS_LIMIT,
};

mod intent;
pub use intent::DeploymentIntent;

mod node;
pub use node::{NodeReceipt, RollupNode};

mod alloy_node;
pub use alloy_node::AlloyNode;

mod signer;
pub use signer::{parse_private_key, SignedTransaction, SigningContext, TxParams};

mod wait;
pub use wait::{wait_for_receipt, ConfirmationPolicy};

mod creator;
pub use creator::{PendingDeployment, RollupContracts, RollupCreator, RollupDeployment};
