//! HTTP API consumed by the Feedo dashboard
//!
//! Serves the store, the analytics selectors, file uploads, the chat relay
//! and a change stream from one axum router.

pub mod api;
pub mod chat;
pub mod error;
pub mod events;
pub mod server;

pub use server::{router, run, AppState};
