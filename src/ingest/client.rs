//! HTTP client for the external CSV/Excel analysis service

use crate::core::error::{Error, Result};
use crate::core::http::{endpoint, shared_client};
use crate::feedback::RawFeedback;
use reqwest::{multipart, Client};
use serde::Deserialize;
use std::collections::BTreeMap;

// Response envelope of POST /api/analyze-csv
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    success: bool,
    data: Option<AnalyzeData>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeData {
    #[serde(default)]
    feedbacks: Vec<RawFeedback>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: Option<String>,
}

pub struct AnalysisClient {
    client: Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: shared_client(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn unreachable(&self, e: reqwest::Error) -> Error {
        tracing::warn!("Analysis service unreachable at {}: {}", self.base_url, e);
        Error::NetworkUnavailable {
            message: format!(
                "Could not connect to the feedback analysis service at {}. Ensure it is running.",
                self.base_url
            ),
        }
    }

    /// Send one file for analysis and return the parsed rows
    pub async fn analyze(&self, file_name: &str, bytes: Vec<u8>) -> Result<Vec<RawFeedback>> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(endpoint(&self.base_url, "/api/analyze-csv"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        let status = res.status();
        let body = res.bytes().await.map_err(|e| self.unreachable(e))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("Failed to analyze file (HTTP {})", status.as_u16()));
            return Err(Error::AnalysisFailed { message });
        }

        let parsed: AnalyzeResponse =
            serde_json::from_slice(&body).map_err(|e| Error::AnalysisFailed {
                message: format!("Malformed response from analysis service: {}", e),
            })?;

        if !parsed.success {
            return Err(Error::AnalysisFailed {
                message: parsed
                    .error
                    .unwrap_or_else(|| "An unknown error occurred during analysis.".to_string()),
            });
        }

        parsed
            .data
            .map(|d| d.feedbacks)
            .ok_or_else(|| Error::AnalysisFailed {
                message: "Malformed response from analysis service: missing data".to_string(),
            })
    }

    /// True when the service answers `GET /api/health` with status "ok"
    pub async fn health(&self) -> Result<bool> {
        let res = self
            .client
            .get(endpoint(&self.base_url, "/api/health"))
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        if !res.status().is_success() {
            return Ok(false);
        }

        let body: HealthResponse = res.json().await?;
        Ok(body
            .status
            .map(|s| s.eq_ignore_ascii_case("ok"))
            .unwrap_or(false))
    }

    /// Keyword lists the service uses to categorize feedback
    pub async fn keywords(&self) -> Result<BTreeMap<String, Vec<String>>> {
        let res = self
            .client
            .get(endpoint(&self.base_url, "/api/keywords"))
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        if !res.status().is_success() {
            return Err(Error::UpstreamError {
                message: format!("Keyword lookup failed (HTTP {})", res.status().as_u16()),
            });
        }

        Ok(res.json().await?)
    }
}
