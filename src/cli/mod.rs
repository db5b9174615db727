//! CLI command definitions and handlers

pub mod ask;
pub mod health;
pub mod ingest;
pub mod serve;
pub mod stats;

use clap::{Parser, Subcommand};

const LONG_ABOUT: &str = r#"
Feedback ingestion, analytics and AI chat relay for the Feedo dashboard.

QUICK START:
    1. feedo serve                    Start the dashboard API on port 3001
    2. Upload a CSV/Excel export from the dashboard (or POST /api/feedback/upload)
    3. feedo ask "What should we fix first?"

STANDALONE:
    feedo ingest feedback.csv         Analyze an export and list the records
    feedo stats feedback.xlsx         Counts, urgency breakdown and weekly report
    feedo health                      Check the analysis service and chat proxy

CONFIGURATION:
    Settings live in $FEEDO_HOME/config.toml. GEMINI_API_KEY, PORT, FEEDO_ENV,
    FEEDO_CORS_ORIGINS, FEEDO_ANALYSIS_URL and FEEDO_PROXY_URL override them.
    Set FEEDO_LOG=debug for verbose logs.
"#;

/// Feedback management backend
#[derive(Parser, Debug)]
#[command(name = "feedo")]
#[command(author, version)]
#[command(about = "Feedback ingestion, analytics and AI chat relay")]
#[command(long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the dashboard API and chat proxy
    #[command(visible_alias = "s")]
    Serve(serve::ServeArgs),

    /// Analyze a feedback export and print the normalized records
    #[command(visible_alias = "i")]
    Ingest(ingest::IngestArgs),

    /// Ask the AI assistant about loaded feedback
    Ask(ask::AskArgs),

    /// Print dashboard statistics for a feedback export
    Stats(stats::StatsArgs),

    /// Check the analysis service and the chat proxy
    Health(health::HealthArgs),
}
