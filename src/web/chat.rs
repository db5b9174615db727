//! Chat relay endpoint - `/api/gemini/chat`

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::ai::FeedbackData;
use crate::core::error::Error;
use crate::web::server::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChatRequest {
    pub question: Option<String>,
    pub feedback_data: Option<FeedbackData>,
}

pub async fn api_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    let request_id = uuid::Uuid::new_v4();
    tracing::info!(
        %request_id,
        question_chars = request.question.as_deref().map_or(0, str::len),
        "Received chat request"
    );

    let question = request.question.unwrap_or_default();
    match state.chat.ask(&question, request.feedback_data).await {
        Ok(answer) => (StatusCode::OK, Json(json!({ "response": answer }))),
        Err(Error::InvalidRequest { message }) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
        }
        Err(e) => {
            tracing::error!(%request_id, "Gemini API error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to get AI response",
                    "message": e.to_string(),
                    "details": format!("{}: {}", e.kind(), e),
                })),
            )
        }
    }
}
