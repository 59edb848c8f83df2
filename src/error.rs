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
    #[error("{0} secret is not set")]
    MissingCredential(&'static str),

    #[error("Close Powerlifting API error: {0}")]
    UpstreamApi(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message used when the API rejects the bearer credential.
    pub const UPSTREAM_CREDENTIAL_REJECTED: &'static str = "API key rejected";
    /// Message used when the API rate limits us.
    pub const UPSTREAM_RATE_LIMIT: &'static str = "Rate limit exceeded";

    /// Whether the upstream API rejected our credential (401/403).
    pub fn is_credential_rejected(&self) -> bool {
        matches!(self, AppError::UpstreamApi(msg) if msg == Self::UPSTREAM_CREDENTIAL_REJECTED)
    }

    /// Whether this is a configuration error rather than a runtime failure.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, AppError::MissingCredential(_))
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
        let (status, error, details) = match &self {
            AppError::MissingCredential(name) => {
                tracing::error!(secret = name, "Missing credential");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration_error",
                    Some(self.to_string()),
                )
            }
            AppError::UpstreamApi(msg) => {
                (StatusCode::BAD_GATEWAY, "upstream_error", Some(msg.clone()))
            }
            AppError::Store(msg) => {
                tracing::error!(error = %msg, "Store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "store_error", None)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", None),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
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
