//! Ingest command implementation

use clap::Args;
use std::path::{Path, PathBuf};

use crate::core::config::Config;
use crate::core::error::Result;
use crate::feedback::FeedbackRecord;
use crate::ingest::{AnalysisClient, IngestResult, Ingestor};
use crate::store::FeedbackStore;

/// Arguments for the ingest command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    feedo ingest feedback.csv           Analyze and list records
    feedo ingest export.xlsx --json     JSON output for scripting
    feedo ingest feedback.csv --analysis-url http://localhost:5000")]
pub struct IngestArgs {
    /// CSV or Excel export to analyze
    pub file: PathBuf,

    /// Base URL of the analysis service
    #[arg(long)]
    pub analysis_url: Option<String>,

    /// Output records as JSON
    #[arg(long)]
    pub json: bool,
}

/// Load `file` into a fresh store through the analysis service
pub(crate) async fn load(
    file: &Path,
    analysis_url: Option<String>,
) -> Result<(FeedbackStore, IngestResult)> {
    let mut config = Config::load()?;
    if let Some(url) = analysis_url {
        config.analysis.base_url = url;
    }
    let store = FeedbackStore::new();
    let ingestor = Ingestor::new(AnalysisClient::new(config.analysis.base_url), store.clone());
    let result = ingestor.upload_path(file).await?;
    Ok((store, result))
}

fn print_records(records: &[FeedbackRecord]) {
    for record in records {
        println!(
            "\x1b[36m{:<14}\x1b[0m {:<12} {:<9} {:<12} {}",
            record.id,
            record.category.label(),
            record.urgency.as_str(),
            record.status.as_str(),
            record.summary
        );
    }
}

pub async fn run(args: IngestArgs) -> Result<()> {
    let (store, result) = load(&args.file, args.analysis_url).await?;

    if args.json {
        let snapshot = store.snapshot();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_records(&store.get_all());
    println!();
    println!(
        "\x1b[32m>\x1b[0m Ingested {} records from {}",
        result.ingested, result.file_name
    );
    if result.skipped > 0 {
        println!("\x1b[33m>\x1b[0m Skipped {} rows without a summary", result.skipped);
    }
    Ok(())
}
