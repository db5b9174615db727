//! Mapping of crate errors onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::core::error::Error;

/// Error returned by API handlers
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidFormat { .. } | Error::InvalidRequest { .. } | Error::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NoFeedbackData => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::AnalysisFailed { .. } | Error::UpstreamError { .. } => StatusCode::BAD_GATEWAY,
            Error::NetworkUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Error::ConfigError { .. }
            | Error::Io(_)
            | Error::TomlParse(_)
            | Error::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{} ({})", self.0, self.0.kind());
        } else {
            tracing::debug!("{} ({})", self.0, self.0.kind());
        }
        let body = json!({
            "error": self.0.to_string(),
            "kind": self.0.kind(),
        });
        (status, Json(body)).into_response()
    }
}

/// Blank or missing summary on a submitted record
pub fn unprocessable(message: String) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": message, "kind": "invalid_record" })),
    )
        .into_response()
}
