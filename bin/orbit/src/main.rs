//! Main entrypoint for the orbit binary.

use anyhow::{anyhow, Result};
use clap::Parser;
use cli::OrbitCli;
use orbit_deployer::RollupCreator;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};

mod cli;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let cli = OrbitCli::parse();
    init_tracing_subscriber(cli.v)?;

    let intent = cli.intent()?;
    let config = cli.deployer_config()?;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!(target: "orbit", "Received interrupt, cancelling deployment");
            trigger.cancel();
        }
    });

    let creator =
        RollupCreator::connect_with_cancellation(&cli.private_key, &cli.rpc_url, config, cancel)
            .await
            .map_err(|e| anyhow!("Failed to initialize deployer: {e}"))?;

    let pending = creator
        .request_deployment(&intent)
        .await
        .map_err(|e| anyhow!("Failed to submit deployment: {e}"))?;
    info!(target: "orbit", "Waiting for deployment transaction {}", pending.tx_hash);

    let deployment = creator
        .resolve_deployment(intent.chain_id, &pending)
        .await
        .map_err(|e| anyhow!("Failed to resolve deployment {}: {e}", pending.tx_hash))?;

    println!("{}", serde_json::to_string_pretty(&deployment.contracts)?);
    info!(target: "orbit", "Exiting orbit.");
    Ok(())
}

/// Initializes the tracing subscriber
///
/// # Arguments
/// * `verbosity_level` - The verbosity level (0-4)
///
/// # Returns
/// * `Result<()>` - Ok if successful, Err otherwise.
fn init_tracing_subscriber(verbosity_level: u8) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(match verbosity_level {
            0 => Level::ERROR,
            1 => Level::WARN,
            2 => Level::INFO,
            3 => Level::DEBUG,
            _ => Level::TRACE,
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(|e| anyhow!(e))
}
