//! Feedback, analytics and upload endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::analytics::{
    chart_data, compute_stats, filter_by_facets, filter_by_search, urgent_issues, weekly_report,
    ChartData, FacetFilter, Stats, WeeklyReport,
};
use crate::core::error::Error;
use crate::feedback::{FeedbackRecord, Status};
use crate::ingest::IngestResult;
use crate::view::{EditableTable, UrgentIssues};
use crate::web::error::{unprocessable, ApiError};
use crate::web::server::AppState;

// =============================================================================
// API TYPES
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub urgency: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub items: Vec<FeedbackRecord>,
    /// Records in the store
    pub total: usize,
    /// Records after search and facets
    pub filtered: usize,
    pub version: u64,
    pub file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    /// Outer `None` when the key is absent; `Some(None)` for an explicit
    /// `null`, which drops the record from the working list
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<Status>>,
}

// Distinguishes `"status": null` from a missing key
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<Status>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Status>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub removed: usize,
    pub version: u64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<FeedbackRecord>,
}

// =============================================================================
// HANDLERS
// =============================================================================

pub async fn api_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "geminiConfigured": state.chat.is_configured(),
        "version": env!("CARGO_PKG_VERSION"),
        "records": state.store.len(),
        "environment": state.config.server.environment,
    }))
}

pub async fn api_list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let facets = FacetFilter::parse(
        query.category.as_deref(),
        query.urgency.as_deref(),
        query.status.as_deref(),
    )
    .map_err(Error::invalid_request)?;

    let snapshot = state.store.snapshot();
    let searched = filter_by_search(&snapshot.records, query.search.as_deref().unwrap_or(""));
    let items = filter_by_facets(&searched, &facets);

    Ok(Json(ListResponse {
        total: snapshot.records.len(),
        filtered: items.len(),
        items,
        version: snapshot.version,
        file_name: snapshot.file_name,
    }))
}

pub async fn api_upsert(
    State(state): State<AppState>,
    Json(record): Json<FeedbackRecord>,
) -> Response {
    if let Err(message) = record.validate() {
        return unprocessable(message);
    }
    let version = state.store.upsert(record.clone());
    tracing::debug!("Upserted {} (version {})", record.id, version);
    Json(record).into_response()
}

pub async fn api_remove(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.store.remove(&id);
    StatusCode::NO_CONTENT
}

pub async fn api_set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<StatusResponse>, ApiError> {
    let status = update
        .status
        .ok_or_else(|| Error::invalid_request("Field `status` is required (use null to remove)"))?;
    if status.is_some() && state.store.get(&id).is_none() {
        return Err(Error::NotFound { id }.into());
    }
    let version = state.store.set_status(&id, status);
    let record = status.and_then(|_| state.store.get(&id));
    Ok(Json(StatusResponse { version, record }))
}

/// Allocate a `manual-{millis}` placeholder at the top of the list
pub async fn api_new(State(state): State<AppState>) -> Result<Json<FeedbackRecord>, ApiError> {
    let mut table = EditableTable::new(state.store.clone());
    let id = table.add_new(chrono::Utc::now());
    let record = state
        .store
        .get(&id)
        .ok_or_else(|| Error::NotFound { id: id.clone() })?;
    Ok(Json(record))
}

/// Complete the given urgent issues, removing them from the working list
pub async fn api_complete_urgent(
    State(state): State<AppState>,
    Json(request): Json<CompleteRequest>,
) -> Json<CompleteResponse> {
    let mut urgent = UrgentIssues::new(state.store.clone());
    for id in &request.ids {
        if !urgent.is_selected(id) {
            urgent.toggle(id);
        }
    }
    let removed = urgent.mark_selected_complete();
    Json(CompleteResponse {
        removed,
        version: state.store.version(),
    })
}

pub async fn api_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResult>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_request(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| Error::invalid_request("Uploaded file has no name"))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::invalid_request(e.body_text()))?;

        tracing::info!("Received upload {} ({} bytes)", file_name, bytes.len());
        let result = state.ingestor.upload(&file_name, bytes.to_vec()).await?;
        return Ok(Json(result));
    }

    Err(Error::invalid_request("No file uploaded (expected multipart field `file`)").into())
}

pub async fn api_stats(State(state): State<AppState>) -> Json<Stats> {
    Json(compute_stats(&state.store.get_all()))
}

pub async fn api_urgent(State(state): State<AppState>) -> Json<Vec<FeedbackRecord>> {
    Json(urgent_issues(&state.store.get_all()))
}

pub async fn api_analytics(State(state): State<AppState>) -> Json<ChartData> {
    Json(chart_data(&state.store.get_all()))
}

pub async fn api_weekly_report(State(state): State<AppState>) -> Json<WeeklyReport> {
    Json(weekly_report(&state.store.get_all()))
}
