//! Feedo - feedback ingestion, analytics and AI chat relay
//!
//! Feedback exports are analyzed by an external service, normalized into
//! [`feedback::FeedbackRecord`]s and held in a shared [`store::FeedbackStore`].
//! The dashboard reads filtered lists, counts and chart series derived from
//! the store and asks questions about it through a Gemini-backed relay.

pub mod ai;
pub mod analytics;
pub mod cli;
pub mod core;
pub mod feedback;
pub mod ingest;
pub mod store;
pub mod view;
pub mod web;

pub use core::config::Config;
pub use core::error::{Error, Result};
pub use feedback::FeedbackRecord;
pub use store::FeedbackStore;
