//! Error types for Feedo

use thiserror::Error;

/// Result type alias using Feedo's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Feedo error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid file format: {file_name} (expected .csv, .xlsx or .xls)")]
    InvalidFormat { file_name: String },

    #[error("{message}")]
    NetworkUnavailable { message: String },

    #[error("{message}")]
    AnalysisFailed { message: String },

    #[error("{message}")]
    UpstreamError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("{message}")]
    InvalidRequest { message: String },

    #[error("No feedback data loaded. Upload a CSV or Excel file before asking questions.")]
    NoFeedbackData,

    #[error("Feedback not found: {id}")]
    NotFound { id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Short machine-readable kind, used in API error bodies and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidFormat { .. } => "invalid_format",
            Error::NetworkUnavailable { .. } => "network_unavailable",
            Error::AnalysisFailed { .. } => "analysis_failed",
            Error::UpstreamError { .. } => "upstream_error",
            Error::ConfigError { .. } => "configuration_error",
            Error::InvalidRequest { .. } => "invalid_request",
            Error::NoFeedbackData => "no_feedback_data",
            Error::NotFound { .. } => "not_found",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::TomlParse(_) => "toml",
            Error::Http(_) => "http",
        }
    }

    pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
        Error::InvalidRequest {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::ConfigError {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        let err = Error::AnalysisFailed {
            message: "bad header row".to_string(),
        };
        assert_eq!(err.to_string(), "bad header row");
        assert_eq!(err.kind(), "analysis_failed");

        let err = Error::InvalidFormat {
            file_name: "notes.txt".to_string(),
        };
        assert!(err.to_string().contains("notes.txt"));
    }

    #[test]
    fn test_config_helper() {
        let err = Error::config("GEMINI_API_KEY not configured");
        assert_eq!(
            err.to_string(),
            "Configuration error: GEMINI_API_KEY not configured"
        );
        assert_eq!(err.kind(), "configuration_error");
    }
}
