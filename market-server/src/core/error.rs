//! Domain error taxonomy
//!
//! Services return [`MarketError`]; handlers convert it into the shared
//! [`AppError`] which owns the wire format.

use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use shared::{AppError, ErrorCode};
use thiserror::Error;

use crate::db::repository::RepoError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    /// Malformed or missing input
    #[error("Invalid argument: {message}")]
    InvalidArgument { code: ErrorCode, message: String },

    /// Role check failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        requested: Decimal,
        available: Decimal,
    },

    /// Lost a write race; retried internally and never surfaced directly
    #[error("Concurrent modification detected")]
    ConcurrencyConflict,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
        }
    }

    pub fn invalid_with(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }
}

impl From<RepoError> for MarketError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(_) => Self::NotFound("Record"),
            RepoError::Duplicate(_) => Self::AlreadyExists("Record"),
            RepoError::Validation(msg) => Self::invalid(msg),
            RepoError::Database(msg) => Self::Internal(msg),
        }
    }
}

impl From<MarketError> for AppError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::InvalidArgument { code, message } => AppError::with_message(code, message),
            MarketError::Unauthorized(message) => {
                AppError::with_message(ErrorCode::PermissionDenied, message)
            }
            MarketError::NotFound(what) => {
                let code = match what {
                    "Listing" => ErrorCode::ListingNotFound,
                    "Order" => ErrorCode::OrderNotFound,
                    "Account" => ErrorCode::AccountNotFound,
                    _ => ErrorCode::NotFound,
                };
                AppError::with_message(code, format!("{} not found", what))
            }
            MarketError::InsufficientStock {
                requested,
                available,
            } => AppError::new(ErrorCode::InsufficientStock)
                .with_detail("requested", requested.to_string())
                .with_detail("available", available.to_string()),
            MarketError::ConcurrencyConflict | MarketError::ServiceUnavailable(_) => {
                tracing::warn!(error = %err, "Store unavailable");
                AppError::service_unavailable()
            }
            MarketError::AlreadyExists("Email") => AppError::new(ErrorCode::EmailAlreadyRegistered),
            MarketError::AlreadyExists(what) => AppError::already_exists(what),
            MarketError::InvalidCredentials => AppError::invalid_credentials(),
            MarketError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                AppError::internal("Internal server error")
            }
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

/// Result type for domain services
pub type MarketResult<T> = Result<T, MarketError>;
