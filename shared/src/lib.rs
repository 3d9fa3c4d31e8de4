//! Shared types for the farm marketplace
//!
//! Error types, the response envelope, and API models used by the server
//! and any Rust client.

pub mod error;
pub mod models;

// Re-exports
pub use axum::{Json, body};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
