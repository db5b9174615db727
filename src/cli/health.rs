//! Health command implementation

use clap::Args;

use crate::ai::ChatClient;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::ingest::AnalysisClient;

/// Arguments for the health command
#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Base URL of the analysis service
    #[arg(long)]
    pub analysis_url: Option<String>,

    /// Chat proxy URL
    #[arg(long)]
    pub proxy_url: Option<String>,
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "\x1b[32mok\x1b[0m"
    } else {
        "\x1b[31mdown\x1b[0m"
    }
}

pub async fn run(args: HealthArgs) -> Result<()> {
    let config = Config::load()?;
    let analysis = AnalysisClient::new(args.analysis_url.unwrap_or(config.analysis.base_url));
    let proxy = ChatClient::new(args.proxy_url.unwrap_or(config.gemini.proxy_url));

    let analysis_ok = analysis.health().await.unwrap_or_else(|e| {
        tracing::debug!("Analysis health check failed: {}", e);
        false
    });
    println!("Analysis service  {}  {}", mark(analysis_ok), analysis.base_url());

    match proxy.health().await {
        Ok(health) => {
            println!("Chat proxy        {}  {}", mark(true), proxy.proxy_url());
            println!(
                "  Gemini configured: {}  Records loaded: {}",
                if health.gemini_configured { "yes" } else { "no" },
                health.records
            );
        }
        Err(e) => {
            tracing::debug!("Proxy health check failed: {}", e);
            println!("Chat proxy        {}  {}", mark(false), proxy.proxy_url());
        }
    }
    Ok(())
}
