//! Valuation REST API server

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use valuation_gateway::{initialize_logging, GatewayConfig, ValuationGateway, VERSION};

#[derive(Parser)]
#[command(name = "valuation-server", version, about = "Serve football player valuations over HTTP")]
struct Args {
    /// TOML configuration file
    #[arg(long, env = "VALUATION_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured port
    #[arg(long)]
    port: Option<u16>,

    /// Override the configured model artifact
    #[arg(long)]
    model: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let mut config =
        GatewayConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(model) = args.model {
        config.valuation.model.artifact_path = model;
    }

    initialize_logging(&config.logging)?;
    info!("Starting ValuationGateway v{}", VERSION);
    info!("Model artifact: {:?}", config.valuation.model.artifact_path);

    let gateway = ValuationGateway::new(config);
    gateway
        .run(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await
        .context("ValuationGateway failed")?;

    Ok(())
}
