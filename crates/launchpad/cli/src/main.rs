//! Launchpad CLI
//!
//! Terminal driver for the launchpad workflow core:
//! - preview milestone fund allocation for a milestone count and goal
//! - run a scripted end-to-end project workflow against in-memory backends

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

use commands::{allocate, simulate};
use config::LaunchpadConfig;

/// Launchpad CLI application
#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Milestone crowdfunding workflow tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "LAUNCHPAD_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fund allocation for a number of milestones
    Allocate(allocate::AllocateArgs),

    /// Run a scripted project workflow against in-memory backends
    Simulate(simulate::SimulateArgs),
}

/// Log filter used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = default_filter(cli.verbose);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = LaunchpadConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Allocate(args) => allocate::execute(args, &config),
        Commands::Simulate(args) => simulate::execute(args, &config).await,
    }
}
