// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Randomness error: {0}")]
    Randomness(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message shown when no user holds the presented refresh token.
    pub const INVALID_REFRESH_TOKEN: &'static str = "Invalid or non-existent refresh token";
    /// Message shown when the presented refresh token is past its expiry.
    pub const EXPIRED_REFRESH_TOKEN: &'static str = "Refresh token expired";

    /// Whether this error means the service itself is unhealthy
    /// (disk or entropy failure) rather than a client-facing outcome.
    pub fn is_server_fault(&self) -> bool {
        matches!(
            self,
            AppError::Persistence(_) | AppError::Randomness(_) | AppError::Internal(_)
        )
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "persistence_error"),
            AppError::Randomness(_) => (StatusCode::INTERNAL_SERVER_ERROR, "randomness_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        // Server faults are logged here and never echoed to the client
        let details = if self.is_server_fault() {
            tracing::error!(error = %self, "Request failed with server fault");
            None
        } else {
            match self {
                AppError::Validation(msg)
                | AppError::Unauthorized(msg)
                | AppError::Forbidden(msg)
                | AppError::NotFound(msg)
                | AppError::Conflict(msg) => Some(msg),
                _ => None,
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
