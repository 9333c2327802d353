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
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Session expired")]
    SessionExpired,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Auth provider error: {0}")]
    AuthProvider(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Embedding service error: {0}")]
    Embedding(String),

    #[error("Recommendation service error: {0}")]
    Recommender(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Coarse classification used to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No (or expired) session: redirect to login.
    Authentication,
    /// Wrong role: render access denied in place.
    Authorization,
    /// Request rejected before reaching any service.
    Input,
    /// An external service failed: transient notice, no retry.
    Service,
    Internal,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Unauthorized | AppError::InvalidToken | AppError::SessionExpired => {
                ErrorCategory::Authentication
            }
            AppError::AccessDenied(_) => ErrorCategory::Authorization,
            AppError::NotFound(_) | AppError::BadRequest(_) => ErrorCategory::Input,
            AppError::AuthProvider(_)
            | AppError::Backend(_)
            | AppError::Embedding(_)
            | AppError::Recommender(_) => ErrorCategory::Service,
            AppError::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Message suitable for a user-visible notice.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized | AppError::InvalidToken => "Please log in to continue.".into(),
            AppError::SessionExpired => "Your session has expired. Please log in again.".into(),
            AppError::AccessDenied(_) => "Access denied.".into(),
            AppError::NotFound(msg) | AppError::BadRequest(msg) => msg.clone(),
            AppError::AuthProvider(msg) => format!("Authentication failed: {}", msg),
            AppError::Backend(_) => "Could not reach the server. Please try again.".into(),
            AppError::Embedding(_) => "Failed to generate embedding.".into(),
            AppError::Recommender(msg) => msg.clone(),
            AppError::Internal(_) => "Something went wrong. Please try again.".into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
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
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::SessionExpired => (StatusCode::UNAUTHORIZED, "session_expired", None),
            AppError::AccessDenied(msg) => {
                (StatusCode::FORBIDDEN, "access_denied", Some(msg.clone()))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::AuthProvider(msg) => {
                tracing::warn!(error = %msg, "Auth provider error");
                (StatusCode::BAD_GATEWAY, "auth_provider_error", Some(msg.clone()))
            }
            AppError::Backend(msg) => {
                tracing::error!(error = %msg, "Backend error");
                (StatusCode::BAD_GATEWAY, "backend_error", None)
            }
            AppError::Embedding(msg) => {
                tracing::error!(error = %msg, "Embedding service error");
                (StatusCode::BAD_GATEWAY, "embedding_error", Some(self.user_message()))
            }
            AppError::Recommender(msg) => {
                (StatusCode::BAD_GATEWAY, "recommender_error", Some(msg.clone()))
            }
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
