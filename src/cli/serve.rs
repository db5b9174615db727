//! Serve command implementation

use clap::Args;

use crate::core::config::{Config, Environment};
use crate::core::error::Result;

/// Arguments for the serve command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:
    feedo serve                         Listen on 127.0.0.1:3001
    feedo serve --port 8000             Use custom port
    feedo serve --host 0.0.0.0 --production
    GEMINI_API_KEY=... feedo serve      Enable the chat relay")]
pub struct ServeArgs {
    /// Port to listen on (default: config or 3001)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Use the production CORS policy (FEEDO_CORS_ORIGINS)
    #[arg(long)]
    pub production: bool,

    /// Base URL of the analysis service
    #[arg(long)]
    pub analysis_url: Option<String>,

    /// Open the health endpoint in a browser
    #[arg(long)]
    pub open: bool,
}

impl ServeArgs {
    fn apply(self, config: &mut Config) -> bool {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if self.production {
            config.server.environment = Environment::Production;
        }
        if let Some(url) = self.analysis_url {
            config.analysis.base_url = url;
        }
        self.open
    }
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = Config::load()?;
    let open_browser = args.apply(&mut config);
    crate::web::run(config, open_browser).await
}
