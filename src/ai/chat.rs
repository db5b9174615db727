//! Server side of the chat relay

use super::gemini::GeminiClient;
use super::prompt::{build_prompt, FeedbackData};
use crate::core::error::{Error, Result};

pub struct ChatService {
    gemini: GeminiClient,
}

impl ChatService {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    pub fn is_configured(&self) -> bool {
        self.gemini.is_configured()
    }

    /// Answer `question` about the posted feedback data with one Gemini call
    pub async fn ask(&self, question: &str, data: Option<FeedbackData>) -> Result<String> {
        if !self.gemini.is_configured() {
            return Err(Error::config("GEMINI_API_KEY not configured"));
        }
        if question.trim().is_empty() {
            return Err(Error::invalid_request("Question is required"));
        }

        let context = data.unwrap_or_default().into_context();
        let prompt = build_prompt(question, &context);

        tracing::info!(model = self.gemini.model(), prompt_chars = prompt.len(), "Calling Gemini API");
        let answer = self.gemini.generate(&prompt).await?;
        tracing::info!(answer_chars = answer.len(), "Gemini responded successfully");

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GeminiConfig;

    fn unconfigured() -> ChatService {
        ChatService::new(GeminiClient::new(&GeminiConfig::default()))
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let config = GeminiConfig {
            api_key: Some("AIzaTest".to_string()),
            ..GeminiConfig::default()
        };
        let service = ChatService::new(GeminiClient::new(&config));
        let err = service.ask("  ", None).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest { .. }));
        assert_eq!(err.to_string(), "Question is required");
    }

    #[tokio::test]
    async fn test_missing_key() {
        let service = unconfigured();
        assert!(!service.is_configured());
        let err = service.ask("What now?", None).await.unwrap_err();
        assert!(matches!(err, Error::ConfigError { .. }));

        // checked before the question
        let err = service.ask("", None).await.unwrap_err();
        assert!(matches!(err, Error::ConfigError { .. }));
    }
}
