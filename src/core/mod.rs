//! Core types shared by every component

pub mod config;
pub mod error;
pub mod http;
