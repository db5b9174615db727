//! Ask command implementation

use clap::Args;
use std::path::PathBuf;

use crate::ai::ChatClient;
use crate::core::config::Config;
use crate::core::error::Result;

/// Arguments for the ask command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    feedo ask \"What should we fix first?\"             Use records loaded in `feedo serve`
    feedo ask \"Summarize UX issues\" -f feedback.csv   Analyze an export first")]
pub struct AskArgs {
    /// The question to ask
    pub question: String,

    /// Export to analyze instead of the server's loaded records
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Chat proxy URL (default: config or http://localhost:3001)
    #[arg(long)]
    pub proxy_url: Option<String>,
}

pub async fn run(args: AskArgs) -> Result<()> {
    let config = Config::load()?;
    let client = ChatClient::new(args.proxy_url.unwrap_or(config.gemini.proxy_url));

    let (records, file_name) = match &args.file {
        Some(file) => {
            let (store, result) = super::ingest::load(file, None).await?;
            (store.get_all(), Some(result.file_name))
        }
        None => client.records().await?,
    };

    eprintln!("Thinking...");
    let answer = client
        .ask(&args.question, &records, file_name.as_deref())
        .await?;

    println!("\n---\n");
    println!("{}", answer);
    println!("\n---\n");
    println!("Based on {} feedback items.", records.len());
    Ok(())
}
