//! Command-line access to the valuation engine

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

use valuation_engine::{PlayerStatsRequest, ValuationConfig, ValuationEngine, ValuationResponse};

#[derive(Parser)]
#[command(name = "valuation-cli", version, about = "Value football players from the command line")]
struct Cli {
    /// Model artifact (defaults to VALUATION_MODEL_PATH or the built-in path)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Value a single player and print the response payload
    Value(PlayerArgs),

    /// Print model metadata and its feature schema
    Inspect,
}

#[derive(Args)]
struct PlayerArgs {
    #[arg(long, default_value_t = 0)]
    goals: u32,
    #[arg(long, default_value_t = 0)]
    assists: u32,
    #[arg(long, default_value_t = 0)]
    minutes_played: u32,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    age_momentum: f64,
    #[arg(long, default_value_t = 0.0)]
    prev_value: f64,
    #[arg(long, default_value_t = 0)]
    days_injured: u32,
    #[arg(long)]
    country: String,
    #[arg(long)]
    position: String,
}

impl From<PlayerArgs> for PlayerStatsRequest {
    fn from(args: PlayerArgs) -> Self {
        Self {
            goals: args.goals,
            assists: args.assists,
            minutes_played: args.minutes_played,
            age_momentum: args.age_momentum,
            prev_value: args.prev_value,
            days_injured: args.days_injured,
            country: args.country,
            position: args.position,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ValuationConfig::from_env()?;
    if let Some(model) = cli.model {
        config.model.artifact_path = model;
    }

    let engine = ValuationEngine::from_config(&config).with_context(|| {
        format!("Failed to load model from {:?}", config.model.artifact_path)
    })?;

    match cli.command {
        Command::Value(args) => {
            let request = PlayerStatsRequest::from(args);
            let result = engine.value(&request);
            if let Err(e) = &result {
                error!("Valuation failed: {}", e);
            }
            let payload = ValuationResponse::from(result);
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::Inspect => {
            let model = engine.model();
            let payload = serde_json::json!({
                "kind": model.kind(),
                "source": model.source(),
                "feature_count": model.schema().len(),
                "feature_names": model.schema().names(),
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }

    Ok(())
}
