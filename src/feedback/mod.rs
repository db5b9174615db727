//! Feedback records and ingestion-boundary normalization

pub mod model;
pub mod normalize;

pub use model::{Category, FeedbackRecord, Impact, Status, Urgency};
pub use normalize::{normalize_all, Normalized, RawFeedback};
