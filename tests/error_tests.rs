// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{http::StatusCode, response::IntoResponse};
use career_reco::error::{AppError, ErrorCategory};

mod common;

#[test]
fn test_session_errors_are_authentication() {
    for err in [
        AppError::Unauthorized,
        AppError::InvalidToken,
        AppError::SessionExpired,
    ] {
        assert_eq!(err.category(), ErrorCategory::Authentication);
    }
    assert_eq!(
        AppError::AccessDenied("recruiter".into()).category(),
        ErrorCategory::Authorization
    );
}

#[test]
fn test_external_failures_are_service_errors() {
    assert_eq!(
        AppError::Embedding("timeout".into()).category(),
        ErrorCategory::Service
    );
    assert_eq!(
        AppError::Recommender("down".into()).category(),
        ErrorCategory::Service
    );
    assert_eq!(
        AppError::Backend("offline".into()).category(),
        ErrorCategory::Service
    );
}

#[test]
fn test_user_message_hides_backend_detail() {
    let err = AppError::Backend("connection refused on 10.0.0.3:5432".into());
    assert!(!err.user_message().contains("10.0.0.3"));

    let err = AppError::Embedding("HTTP 500".into());
    assert_eq!(err.user_message(), "Failed to generate embedding.");
}

#[tokio::test]
async fn test_response_shape() {
    let response = AppError::AccessDenied("recruiter".into()).into_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "access_denied");

    let response = AppError::Backend("secret detail".into()).into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "backend_error");
    assert!(body.get("details").is_none());

    let response = AppError::Internal(anyhow::anyhow!("boom")).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
