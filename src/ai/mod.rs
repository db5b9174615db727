//! AI chat assistant: Gemini client, prompt, proxy service and proxy client

pub mod chat;
pub mod client;
pub mod gemini;
pub mod prompt;

pub use chat::ChatService;
pub use client::{ChatClient, ProxyHealth};
pub use gemini::GeminiClient;
pub use prompt::{build_prompt, FeedbackData};
