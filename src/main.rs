//! Feedo CLI entry point

use clap::Parser;
use feedo::cli::{Cli, Commands};
use feedo::core::error::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("FEEDO_LOG"))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => feedo::cli::serve::run(args).await,
        Commands::Ingest(args) => feedo::cli::ingest::run(args).await,
        Commands::Ask(args) => feedo::cli::ask::run(args).await,
        Commands::Stats(args) => feedo::cli::stats::run(args).await,
        Commands::Health(args) => feedo::cli::health::run(args).await,
    }
}
