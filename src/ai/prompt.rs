//! Prompt sent to Gemini for feedback questions

use crate::analytics::FeedbackContext;
use serde::{Deserialize, Serialize};

/// `feedbackData` as posted by clients: a structured context or free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedbackData {
    Text(String),
    Context(FeedbackContext),
}

impl Default for FeedbackData {
    fn default() -> Self {
        FeedbackData::Context(FeedbackContext::default())
    }
}

impl FeedbackData {
    /// Free text is treated as the summary
    pub fn into_context(self) -> FeedbackContext {
        match self {
            FeedbackData::Text(text) => FeedbackContext {
                summary: Some(text).filter(|t| !t.trim().is_empty()),
                ..FeedbackContext::default()
            },
            FeedbackData::Context(ctx) => ctx,
        }
    }
}

fn section(value: Option<&str>, missing: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(missing)
        .to_string()
}

pub fn build_prompt(question: &str, context: &FeedbackContext) -> String {
    let summary = section(context.summary.as_deref(), "No summary available");
    let patterns = section(context.patterns.as_deref(), "No patterns available");
    let suggestions = if context.suggestions.is_empty() {
        "No suggestions available".to_string()
    } else {
        context.suggestions.join("\n")
    };

    format!(
        "You are an AI feedback analyst assistant. Here is the feedback data:\n\
         \n\
         FEEDBACK SUMMARY:\n\
         {summary}\n\
         \n\
         PATTERNS IDENTIFIED:\n\
         {patterns}\n\
         \n\
         CURRENT SUGGESTIONS:\n\
         {suggestions}\n\
         \n\
         USER QUESTION: {question}\n\
         \n\
         Provide a helpful, detailed, and actionable answer based on the feedback data. \
         Be specific and reference the data when relevant. Keep responses concise but informative.",
        summary = summary,
        patterns = patterns,
        suggestions = suggestions,
        question = question.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_with_context() {
        let ctx = FeedbackContext {
            summary: Some("3 feedback items".to_string()),
            patterns: Some("Most reported: bug (67%)".to_string()),
            suggestions: vec!["Fix #1".to_string(), "Fix #2".to_string()],
        };
        let prompt = build_prompt("What should we fix first?", &ctx);

        assert!(prompt.starts_with("You are an AI feedback analyst assistant."));
        assert!(prompt.contains("FEEDBACK SUMMARY:\n3 feedback items\n\nPATTERNS IDENTIFIED:"));
        assert!(prompt.contains("CURRENT SUGGESTIONS:\nFix #1\nFix #2\n\nUSER QUESTION: What should we fix first?"));
    }

    #[test]
    fn test_prompt_placeholders() {
        let prompt = build_prompt("Anything?", &FeedbackContext::default());
        assert!(prompt.contains("No summary available"));
        assert!(prompt.contains("No patterns available"));
        assert!(prompt.contains("No suggestions available"));
    }

    #[test]
    fn test_feedback_data_shapes() {
        let text: FeedbackData = serde_json::from_str("\"plain notes\"").unwrap();
        assert_eq!(text.into_context().summary.as_deref(), Some("plain notes"));

        let obj: FeedbackData =
            serde_json::from_str(r#"{"summary":"s","suggestions":["a"]}"#).unwrap();
        let ctx = obj.into_context();
        assert_eq!(ctx.summary.as_deref(), Some("s"));
        assert_eq!(ctx.patterns, None);
        assert_eq!(ctx.suggestions, vec!["a"]);
    }
}
