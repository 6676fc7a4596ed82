//! `lightwalletd` binary.

use anyhow::{Context, Result};
use clap::Parser;
use lwd_runtime::{Args, Lightwalletd, RuntimeConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = RuntimeConfig::from_args(args).context("invalid configuration")?;

    let _telemetry =
        lw_telemetry::init_telemetry(&config.telemetry).context("initializing telemetry")?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        bind = %config.gateway.addr(),
        node = %config.node.url,
        "Starting lightwalletd"
    );

    let runtime = Lightwalletd::build(config).await?;
    let result = runtime
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        })
        .await;

    if let Err(ref e) = result {
        error!(error = %format_args!("{:#}", e), "lightwalletd exiting");
    }
    result
}
