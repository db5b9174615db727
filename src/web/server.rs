//! Axum server for the Feedo dashboard API

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::ai::{ChatService, GeminiClient};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::ingest::{AnalysisClient, Ingestor};
use crate::store::FeedbackStore;
use crate::web::api::{
    api_analytics, api_complete_urgent, api_health, api_list, api_new, api_remove,
    api_set_status, api_stats, api_upload, api_upsert, api_urgent, api_weekly_report,
};
use crate::web::chat::api_chat;
use crate::web::events::api_events;

/// Spreadsheet exports can exceed axum's 2 MB default
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    pub store: FeedbackStore,
    pub ingestor: Arc<Ingestor>,
    pub chat: Arc<ChatService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire a fresh store to the configured analysis service and Gemini
    pub fn new(config: Config) -> Self {
        let store = FeedbackStore::new();
        let ingestor = Ingestor::new(AnalysisClient::new(&config.analysis.base_url), store.clone());
        let chat = ChatService::new(GeminiClient::new(&config.gemini));
        Self {
            store,
            ingestor: Arc::new(ingestor),
            chat: Arc::new(chat),
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// ROUTER
// =============================================================================

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .allowed_origins()
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let feedback_routes = Router::new()
        .route("/", get(api_list).post(api_upsert))
        .route("/upload", post(api_upload))
        .route("/stats", get(api_stats))
        .route("/new", post(api_new))
        .route("/urgent", get(api_urgent))
        .route("/urgent/complete", post(api_complete_urgent))
        .route("/:id", axum::routing::delete(api_remove))
        .route("/:id/status", put(api_set_status))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    let api_routes = Router::new()
        .route("/health", get(api_health))
        .route("/gemini/chat", post(api_chat))
        .route("/analytics", get(api_analytics))
        .route("/report/weekly", get(api_weekly_report))
        .route("/events", get(api_events))
        .nest("/feedback", feedback_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// SERVER
// =============================================================================

pub async fn run(config: Config, open_browser: bool) -> Result<()> {
    config.validate()?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|_| {
            Error::config(format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            ))
        })?;

    let state = AppState::new(config);
    let gemini_configured = state.chat.is_configured();
    let environment = state.config.server.environment;
    let analysis_url = state.config.analysis.base_url.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    eprintln!();
    eprintln!("\x1b[36m>\x1b[0m feedo API running at \x1b[36mhttp://{}\x1b[0m", addr);
    eprintln!(
        "\x1b[36m>\x1b[0m Gemini API key configured: {}",
        if gemini_configured { "yes" } else { "no" }
    );
    eprintln!("\x1b[36m>\x1b[0m Analysis service: {}", analysis_url);
    eprintln!("\x1b[90m  Health check: http://{}/api/health\x1b[0m", addr);
    eprintln!("\x1b[90m  Press Ctrl+C to stop\x1b[0m");
    tracing::info!(?environment, %addr, "Server listening");

    if open_browser {
        let url = format!("http://{}/api/health", addr);
        if let Err(e) = open::that(&url) {
            tracing::warn!("Could not open browser: {}", e);
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
