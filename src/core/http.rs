//! Outgoing HTTP client shared by the analysis and Gemini clients

use once_cell::sync::Lazy;
use std::time::Duration;

/// Global HTTP client with connection pooling (reused across all requests)
///
/// Only connection setup is bounded; requests themselves run to completion.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_nodelay(true)
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("feedo/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
});

pub fn shared_client() -> reqwest::Client {
    HTTP_CLIENT.clone()
}

/// Join a base URL and an absolute path without doubling slashes
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
