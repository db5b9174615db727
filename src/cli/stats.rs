//! Stats command implementation

use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use crate::analytics::{chart_data, compute_stats, count_by_category, urgency_series, weekly_report};
use crate::core::error::Result;

/// Arguments for the stats command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    feedo stats feedback.csv            Dashboard numbers for an export
    feedo stats feedback.csv --json     Stats, weekly report and chart series")]
pub struct StatsArgs {
    /// CSV or Excel export to analyze
    pub file: PathBuf,

    /// Base URL of the analysis service
    #[arg(long)]
    pub analysis_url: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: StatsArgs) -> Result<()> {
    let (store, result) = super::ingest::load(&args.file, args.analysis_url).await?;
    let records = store.get_all();
    let stats = compute_stats(&records);
    let report = weekly_report(&records);

    if args.json {
        let out = json!({
            "fileName": result.file_name,
            "stats": stats,
            "weeklyReport": report,
            "charts": chart_data(&records),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("\x1b[36m>\x1b[0m {}", result.file_name);
    println!(
        "  Total {}  Critical {}  Ongoing {}  Completed {}",
        stats.total, stats.critical, stats.ongoing, stats.completed
    );
    println!("  Urgent this week {}", report.urgent);

    println!("\nCategories:");
    for (category, count) in count_by_category(&records) {
        println!("  {:<12} {}", category.label(), count);
    }
    println!("\nUrgency:");
    for (urgency, count) in urgency_series(&records) {
        println!("  {:<12} {}", urgency.label(), count);
    }
    Ok(())
}
