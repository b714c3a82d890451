//! Depot Safety — command-line entry point.
//!
//! Usage:
//!   depot-safety predict --name Kim --gender male --age 30 --service-years 5 --task engine-maintenance
//!   depot-safety recommend --name Kim --gender male --age 30 --service-years 5
//!   depot-safety tables dump --output tables.json

mod cli;
mod commands;
mod config;
mod state;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, TablesCommands};
use config::AppConfig;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stderr keeps stdout clean for --format json.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Tables(TablesCommands::Dump { output }) => {
            commands::tables::dump(output.as_deref())
        }
        Commands::Predict(args) => {
            let state = AppState::new(config);
            state.load_model().await?;
            commands::predict::run(&state, args, cli.format).await
        }
        Commands::Recommend(args) => {
            let state = AppState::new(config);
            state.load_model().await?;
            commands::recommend::run(&state, args, cli.format).await
        }
    }
}
