//! Ingestion adapter
//!
//! Sends a feedback export to the analysis service and swaps the store
//! contents for the result. A failed upload clears the store so stale data is
//! never shown as if it came from the new file.

pub mod client;

pub use client::AnalysisClient;

use crate::core::error::{Error, Result};
use crate::feedback::normalize_all;
use crate::store::FeedbackStore;
use serde::Serialize;
use std::path::Path;

/// Extensions the analysis service can parse
pub const SUPPORTED_EXTENSIONS: [&str; 3] = [".csv", ".xlsx", ".xls"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResult {
    pub file_name: String,
    pub ingested: usize,
    /// Rows without any usable text
    pub skipped: usize,
    pub version: u64,
}

pub fn is_supported_file(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

pub struct Ingestor {
    client: AnalysisClient,
    store: FeedbackStore,
}

impl Ingestor {
    pub fn new(client: AnalysisClient, store: FeedbackStore) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &AnalysisClient {
        &self.client
    }

    /// Analyze `bytes` as `file_name` and replace the store contents
    ///
    /// Exactly one store mutation happens unless the file name is rejected
    /// up front: the parsed records on success, an empty list otherwise.
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<IngestResult> {
        if !is_supported_file(file_name) {
            return Err(Error::InvalidFormat {
                file_name: file_name.to_string(),
            });
        }

        tracing::info!(file = file_name, bytes = bytes.len(), "Uploading feedback export for analysis");

        match self.client.analyze(file_name, bytes).await {
            Ok(rows) => {
                let normalized = normalize_all(rows, chrono::Utc::now().timestamp());
                let ingested = normalized.records.len();
                let version = self
                    .store
                    .replace_all(normalized.records, Some(file_name.to_string()));

                tracing::info!(
                    file = file_name,
                    ingested,
                    skipped = normalized.skipped,
                    "Feedback export ingested"
                );

                Ok(IngestResult {
                    file_name: file_name.to_string(),
                    ingested,
                    skipped: normalized.skipped,
                    version,
                })
            }
            Err(e) => {
                tracing::warn!(file = file_name, error = %e, "Ingestion failed, clearing feedback store");
                self.store.replace_all(Vec::new(), None);
                Err(e)
            }
        }
    }

    /// Read a local file and upload it under its file name
    pub async fn upload_path(&self, path: &Path) -> Result<IngestResult> {
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        if !is_supported_file(&file_name) {
            return Err(Error::InvalidFormat { file_name });
        }

        let bytes = tokio::fs::read(path).await?;
        self.upload(&file_name, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{Category, FeedbackRecord};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn seeded_store() -> FeedbackStore {
        let store = FeedbackStore::new();
        store.replace_all(
            vec![FeedbackRecord::new("old", Category::Other, "stale row")],
            Some("old.csv".to_string()),
        );
        store
    }

    fn three_rows() -> serde_json::Value {
        json!({
            "success": true,
            "data": {
                "feedbacks": [
                    {"id": "FB1", "category": "bug", "summary": "Checkout button broken", "urgency": "high", "status": "pending"},
                    {"id": "FB2", "category": "feature", "summary": "Please add export", "urgency": "low", "status": "completed"},
                    {"id": "FB3", "category": "ux", "summary": "Settings page is confusing", "urgency": "medium", "status": "in-progress"}
                ],
                "stats": {"total": 3}
            }
        })
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_file("feedback.csv"));
        assert!(is_supported_file("Export.XLSX"));
        assert!(is_supported_file("legacy.xls"));
        assert!(!is_supported_file("notes.txt"));
        assert!(!is_supported_file("csv"));
    }

    #[tokio::test]
    async fn test_upload_success_replaces_store() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/analyze-csv"))
            .and(body_string_contains("filename=\"feedback.csv\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(three_rows()))
            .expect(1)
            .mount(&server)
            .await;

        let store = seeded_store();
        let ingestor = Ingestor::new(AnalysisClient::new(server.uri()), store.clone());

        let result = ingestor.upload("feedback.csv", b"text\nrow".to_vec()).await.unwrap();
        assert_eq!(result.ingested, 3);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.version, 2);
        assert_eq!(store.len(), 3);
        assert_eq!(store.source_file_name().as_deref(), Some("feedback.csv"));
        assert!(store.get("old").is_none());
    }

    #[tokio::test]
    async fn test_invalid_format_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let store = seeded_store();
        let ingestor = Ingestor::new(AnalysisClient::new(server.uri()), store.clone());

        let err = ingestor.upload("notes.txt", vec![1, 2, 3]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { .. }));
        // untouched
        assert_eq!(store.version(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_success_false_clears_store() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/analyze-csv"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": false, "error": "bad header row"})),
            )
            .mount(&server)
            .await;

        let store = seeded_store();
        let ingestor = Ingestor::new(AnalysisClient::new(server.uri()), store.clone());

        let err = ingestor.upload("feedback.csv", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::AnalysisFailed { .. }));
        assert_eq!(err.to_string(), "bad header row");
        assert!(store.is_empty());
        assert_eq!(store.source_file_name(), None);
        assert_eq!(store.version(), 2);
    }

    #[tokio::test]
    async fn test_http_error_uses_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "The uploaded file is empty"})),
            )
            .mount(&server)
            .await;

        let store = seeded_store();
        let ingestor = Ingestor::new(AnalysisClient::new(server.uri()), store.clone());

        let err = ingestor.upload("empty.csv", vec![]).await.unwrap_err();
        assert_eq!(err.to_string(), "The uploaded file is empty");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_clears_store() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let store = seeded_store();
        let ingestor = Ingestor::new(AnalysisClient::new(server.uri()), store.clone());

        let err = ingestor.upload("feedback.csv", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::AnalysisFailed { .. }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_service_clears_store() {
        // Grab a free port, then close it so nothing is listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let store = seeded_store();
        let ingestor = Ingestor::new(
            AnalysisClient::new(format!("http://127.0.0.1:{}", port)),
            store.clone(),
        );

        let err = ingestor.upload("feedback.csv", vec![]).await.unwrap_err();
        assert!(matches!(err, Error::NetworkUnavailable { .. }));
        assert!(store.is_empty());
        assert_eq!(store.version(), 2);
    }

    #[tokio::test]
    async fn test_upload_path_reads_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("Checkout button broken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(three_rows()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("export.csv");
        std::fs::write(&file, "feedback_text\nCheckout button broken\n").unwrap();

        let store = FeedbackStore::new();
        let ingestor = Ingestor::new(AnalysisClient::new(server.uri()), store.clone());
        let result = ingestor.upload_path(&file).await.unwrap();

        assert_eq!(result.file_name, "export.csv");
        assert_eq!(store.source_file_name().as_deref(), Some("export.csv"));
    }

    #[tokio::test]
    async fn test_health_and_keywords() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "ok", "message": "Feedback processor is running"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/keywords"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"Bug / Issue Report": ["bug", "crash"]})),
            )
            .mount(&server)
            .await;

        let client = AnalysisClient::new(server.uri());
        assert!(client.health().await.unwrap());
        let keywords = client.keywords().await.unwrap();
        assert_eq!(keywords["Bug / Issue Report"], vec!["bug", "crash"]);
    }
}
