//! Client of the chat proxy, as used by the dashboard and the `ask` command

use crate::analytics::{feedback_context, FeedbackContext};
use crate::core::error::{Error, Result};
use crate::core::http::{endpoint, shared_client};
use crate::feedback::FeedbackRecord;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    question: &'a str,
    feedback_data: FeedbackContext,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

/// `GET /api/health` of the proxy
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyHealth {
    pub status: String,
    #[serde(default)]
    pub gemini_configured: bool,
    #[serde(default)]
    pub records: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordList {
    items: Vec<FeedbackRecord>,
    file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatErrorBody {
    error: Option<String>,
    message: Option<String>,
}

pub struct ChatClient {
    client: Client,
    proxy_url: String,
}

impl ChatClient {
    pub fn new(proxy_url: impl Into<String>) -> Self {
        Self {
            client: shared_client(),
            proxy_url: proxy_url.into(),
        }
    }

    pub fn proxy_url(&self) -> &str {
        &self.proxy_url
    }

    fn unreachable(&self, e: reqwest::Error) -> Error {
        tracing::warn!("Chat proxy unreachable at {}: {}", self.proxy_url, e);
        Error::NetworkUnavailable {
            message: format!(
                "Could not reach the AI chat proxy at {}. Verify the proxy server is running on its expected port (`feedo serve`).",
                self.proxy_url
            ),
        }
    }

    pub async fn health(&self) -> Result<ProxyHealth> {
        let res = self
            .client
            .get(endpoint(&self.proxy_url, "/api/health"))
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        if !res.status().is_success() {
            return Err(Error::UpstreamError {
                message: format!("Chat proxy health check returned HTTP {}", res.status().as_u16()),
            });
        }
        Ok(res.json().await?)
    }

    /// Records currently loaded in the server's store, with their source file
    pub async fn records(&self) -> Result<(Vec<FeedbackRecord>, Option<String>)> {
        let res = self
            .client
            .get(endpoint(&self.proxy_url, "/api/feedback"))
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        if !res.status().is_success() {
            return Err(Error::UpstreamError {
                message: format!("Listing feedback returned HTTP {}", res.status().as_u16()),
            });
        }
        let list: RecordList = res.json().await?;
        Ok((list.items, list.file_name))
    }

    /// Ask the proxy about `records`
    ///
    /// Fails without any request when the question is blank or there is no
    /// feedback to talk about.
    pub async fn ask(
        &self,
        question: &str,
        records: &[FeedbackRecord],
        file_name: Option<&str>,
    ) -> Result<String> {
        if question.trim().is_empty() {
            return Err(Error::invalid_request("Question is required"));
        }
        if records.is_empty() {
            return Err(Error::NoFeedbackData);
        }

        let request = ChatRequest {
            question: question.trim(),
            feedback_data: feedback_context(records, file_name),
        };

        let res = self
            .client
            .post(endpoint(&self.proxy_url, "/api/gemini/chat"))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.json::<ChatErrorBody>().await.ok();
            let message = body
                .and_then(|b| b.message.or(b.error))
                .unwrap_or_else(|| format!("Chat proxy returned HTTP {}", status.as_u16()));
            return Err(Error::UpstreamError { message });
        }

        let body: ChatResponse = res.json().await.map_err(|e| Error::UpstreamError {
            message: format!("Malformed chat proxy response: {}", e),
        })?;
        Ok(body.response)
    }
}
