mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();
    let config = hoplint_config::Config::load()?;

    match cli.command {
        cli::Commands::Audit {
            base_url,
            json,
            budget_bytes,
            concurrency,
            output,
        } => {
            commands::audit::handle(&config, base_url, json, budget_bytes, concurrency, output)
                .await
        }
        cli::Commands::Rules { base_url, json } => {
            commands::rules::handle(&config, base_url, json).await
        }
    }
}
