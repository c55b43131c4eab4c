//! This module contains all CLI-specific code for the orbit binary.

use alloy_primitives::{Address, B256, U256};
use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser};
use orbit_deployer::{DeployerConfig, DeploymentIntent};
use std::path::PathBuf;

mod parser;
use parser::{parse_address, parse_b256, parse_u256};

const ABOUT: &str = "
orbit deploys an Arbitrum Orbit rollup through the RollupCreator factory of its parent chain. It
signs a createRollup transaction, waits for it to be mined and prints the addresses of the new
rollup's contracts as JSON.
";

/// The orbit binary CLI application arguments.
#[derive(Parser, Clone, Debug)]
#[command(about = ABOUT, version)]
pub(crate) struct OrbitCli {
    /// Verbosity level (0-4)
    #[arg(long, short, help = "Verbosity level (0-4)", action = ArgAction::Count)]
    pub(crate) v: u8,
    /// Hex encoded private key of the deployer.
    #[clap(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub(crate) private_key: String,
    /// JSON-RPC endpoint of the parent chain node.
    #[clap(long, env = "PARENT_RPC_URL")]
    pub(crate) rpc_url: String,
    /// Path to a JSON deployer config. Omitted fields keep their default values.
    #[clap(long)]
    pub(crate) config: Option<PathBuf>,
    /// Owner of the new rollup.
    #[clap(long, value_parser = parse_address)]
    pub(crate) owner: Address,
    /// Chain id of the new rollup.
    #[clap(long)]
    pub(crate) chain_id: u64,
    /// Chain config of the new rollup, as a JSON string.
    #[clap(
        long,
        conflicts_with = "chain_config_path",
        required_unless_present = "chain_config_path"
    )]
    pub(crate) chain_config: Option<String>,
    /// Path to the chain config of the new rollup.
    #[clap(long, conflicts_with = "chain_config", required_unless_present = "chain_config")]
    pub(crate) chain_config_path: Option<PathBuf>,
    /// Genesis block number of the new rollup.
    #[clap(long, default_value_t = 0)]
    pub(crate) genesis_block_num: u64,
    /// Receiver of the stake of losing validators.
    #[clap(long, value_parser = parse_address, default_value_t = Address::ZERO)]
    pub(crate) loser_stake_escrow: Address,
    /// Root of the WASM module the rollup validates with.
    #[clap(long, value_parser = parse_b256)]
    pub(crate) wasm_module_root: B256,
    /// The batch poster of the new rollup.
    #[clap(long, value_parser = parse_address)]
    pub(crate) batch_poster: Address,
    /// Comma separated list of validators of the new rollup.
    #[clap(long, value_parser = parse_address, value_delimiter = ',', num_args = 1..)]
    pub(crate) validators: Vec<Address>,
    /// Value sent along with the deployment, in wei.
    #[clap(long, value_parser = parse_u256, default_value = "0")]
    pub(crate) value: U256,
    /// Gas limit of the deployment transaction. Zero uses the configured default.
    #[clap(long, default_value_t = 0)]
    pub(crate) gas_limit: u64,
}

impl OrbitCli {
    /// Builds the [DeploymentIntent] described by the arguments.
    pub(crate) fn intent(&self) -> Result<DeploymentIntent> {
        let chain_config = match (&self.chain_config, &self.chain_config_path) {
            (Some(config), _) => config.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .map_err(|e| anyhow!("Error reading chain config file: {e}"))?,
            (None, None) => return Err(anyhow!("No chain config provided")),
        };

        Ok(DeploymentIntent {
            owner: self.owner,
            chain_id: self.chain_id,
            chain_config,
            genesis_block_num: self.genesis_block_num,
            loser_stake_escrow: self.loser_stake_escrow,
            wasm_module_root: self.wasm_module_root,
            batch_poster: self.batch_poster,
            validators: self.validators.clone(),
            value: self.value,
            gas_limit: self.gas_limit,
        })
    }

    /// Reads the [DeployerConfig] from the file system, or returns the default one.
    pub(crate) fn deployer_config(&self) -> Result<DeployerConfig> {
        let Some(path) = self.config.as_ref() else {
            return Ok(DeployerConfig::default());
        };

        // Read the serialized config from the file system.
        let ser_config = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Error reading deployer config file: {e}"))?;

        // Deserialize the config and return it.
        serde_json::from_str(&ser_config)
            .map_err(|e| anyhow!("Error deserializing deployer config: {e}"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn default_flags() -> Vec<String> {
        let address = Address::repeat_byte(0xaa).to_string();
        let root = B256::ZERO.to_string();
        [
            "orbit",
            "--private-key",
            KEY,
            "--rpc-url",
            "http://localhost:8545",
            "--owner",
            address.as_str(),
            "--chain-id",
            "999",
            "--wasm-module-root",
            root.as_str(),
            "--batch-poster",
            address.as_str(),
            "--validators",
            address.as_str(),
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    #[test]
    fn test_exclusive_chain_config_flags() {
        let cases = [
            // valid
            (["--chain-config", "{}"].as_slice(), true),
            (["--chain-config-path", "dummy"].as_slice(), true),
            // invalid
            (["--chain-config", "{}", "--chain-config-path", "dummy"].as_slice(), false),
            ([].as_slice(), false),
        ];

        for (args_ext, valid) in cases.into_iter() {
            let args = default_flags()
                .into_iter()
                .chain(args_ext.iter().map(|s| s.to_string()))
                .collect::<Vec<_>>();

            let parsed = OrbitCli::try_parse_from(args);
            assert_eq!(parsed.is_ok(), valid, "{args_ext:?}");
        }
    }

    #[test]
    fn test_intent() {
        let validators =
            format!("{},{}", Address::repeat_byte(0xbb), Address::repeat_byte(0xcc));
        let mut args = default_flags();
        args.extend(
            [
                "--chain-config",
                r#"{"chainId":999}"#,
                "--validators",
                validators.as_str(),
                "--value",
                "0x10",
                "-vv",
            ]
            .map(String::from),
        );

        let cli = OrbitCli::try_parse_from(args).unwrap();
        assert_eq!(cli.v, 2);
        assert_eq!(cli.gas_limit, 0);
        assert!(cli.config.is_none());

        let intent = cli.intent().unwrap();
        assert_eq!(intent.chain_id, 999);
        assert_eq!(intent.chain_config, r#"{"chainId":999}"#);
        assert_eq!(intent.owner, Address::repeat_byte(0xaa));
        assert_eq!(intent.loser_stake_escrow, Address::ZERO);
        assert_eq!(intent.value, U256::from(16));
        assert_eq!(
            intent.validators,
            vec![
                Address::repeat_byte(0xaa),
                Address::repeat_byte(0xbb),
                Address::repeat_byte(0xcc)
            ]
        );
    }

    #[test]
    fn test_invalid_address() {
        let mut args = default_flags();
        args[6] = "0x1234".to_string();
        args.extend(["--chain-config", "{}"].map(String::from));
        assert!(OrbitCli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_default_deployer_config() {
        let mut args = default_flags();
        args.extend(["--chain-config", "{}"].map(String::from));
        let cli = OrbitCli::try_parse_from(args).unwrap();
        assert_eq!(cli.deployer_config().unwrap(), DeployerConfig::default());
    }
}
