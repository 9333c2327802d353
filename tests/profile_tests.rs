// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile page tests: placeholders, edits, avatar upload, completion and deletion.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use career_reco::db::ProfileStore;
use career_reco::models::{Role, UserMetadata};
use career_reco::services::AuthProvider;
use tower::ServiceExt;

mod common;

fn authed(method: &str, uri: &str, token: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap()
}

#[tokio::test]
async fn test_missing_row_yields_placeholder() {
    let app = common::create_test_app();
    let user = app.auth.insert_user(
        "new@example.com",
        "password1",
        UserMetadata {
            role: Some(Role::Recruiter),
            ..Default::default()
        },
    );
    let session = app.auth.issue_session(&user).unwrap();

    let response = app
        .app()
        .oneshot(authed("GET", "/profile", &session.access_token, Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["profile_complete"], false);
    assert_eq!(body["role"], "recruiter");
    assert_eq!(body["profile"]["kind"], "recruiter");
    assert_eq!(body["profile"]["company"], "Not specified");
}

#[tokio::test]
async fn test_candidate_profile_includes_resume() {
    let app = common::create_test_app();
    let session = common::signed_in_user(&app, "cand@example.com", Some(Role::Candidate)).await;

    app.app()
        .oneshot(authed(
            "PUT",
            "/resume",
            &session.access_token,
            Body::from(r#"{"skills":["Go"]}"#),
        ))
        .await
        .unwrap();

    let response = app
        .app()
        .oneshot(authed("GET", "/profile", &session.access_token, Body::empty()))
        .await
        .unwrap();

    let body = common::body_json(response).await;
    assert_eq!(body["profile_complete"], true);
    assert_eq!(body["profile"]["first_name"], "Test");
    assert_eq!(body["resume"]["skills"][0], "Go");
}

#[tokio::test]
async fn test_update_changes_only_given_fields() {
    let app = common::create_test_app();
    let session = common::signed_in_user(&app, "cand@example.com", Some(Role::Candidate)).await;

    let response = app
        .app()
        .oneshot(authed(
            "PUT",
            "/profile",
            &session.access_token,
            Body::from(r#"{"bio":"Backend engineer","github":"https://github.com/test"}"#),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let row = app
        .db
        .get_candidate_profile(&session.user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.first_name, "Test");
    assert_eq!(row.bio.as_deref(), Some("Backend engineer"));
    assert!(row.updated_at.is_some());
}

#[tokio::test]
async fn test_update_rejects_invalid_url() {
    let app = common::create_test_app();
    let session = common::signed_in_user(&app, "cand@example.com", Some(Role::Candidate)).await;

    let response = app
        .app()
        .oneshot(authed(
            "PUT",
            "/profile",
            &session.access_token,
            Body::from(r#"{"website":"not a url"}"#),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_avatar_upload_returns_public_url() {
    let app = common::create_test_app();
    let session = common::signed_in_user(&app, "cand@example.com", Some(Role::Candidate)).await;

    let response = app
        .app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/profile/avatar?ext=png")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", session.access_token),
                )
                .header(header::CONTENT_TYPE, "image/png")
                .body(Body::from(vec![0x89, b'P', b'N', b'G']))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:54321/storage/v1/object/public/avatars/"));
    assert!(url.ends_with(".png"));

    let path = url.rsplit('/').next().unwrap();
    assert_eq!(
        app.storage.get(path),
        Some(vec![0x89, b'P', b'N', b'G'])
    );
}

#[tokio::test]
async fn test_avatar_upload_rejects_unknown_extension() {
    let app = common::create_test_app();
    let session = common::signed_in_user(&app, "cand@example.com", Some(Role::Candidate)).await;

    let response = app
        .app()
        .oneshot(authed(
            "POST",
            "/profile/avatar?ext=exe",
            &session.access_token,
            Body::from(vec![1, 2, 3]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_complete_profile_upserts_role_table() {
    let app = common::create_test_app();
    let user = app.auth.insert_user(
        "hire@example.com",
        "password1",
        UserMetadata {
            role: Some(Role::Recruiter),
            ..Default::default()
        },
    );
    let session = app.auth.issue_session(&user).unwrap();

    let response = app
        .app()
        .oneshot(authed(
            "POST",
            "/complete-profile",
            &session.access_token,
            Body::from(
                r#"{"company":"Acme","profile_picture":"https://cdn.example.com/1.png","first_name":"ignored"}"#,
            ),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let row = app.db.get_recruiter_profile(&user.id).await.unwrap().unwrap();
    assert_eq!(row.company, "Acme");
    assert_eq!(row.email, "hire@example.com");
    assert_eq!(
        row.profile_picture.as_deref(),
        Some("https://cdn.example.com/1.png")
    );
    assert!(app.db.get_candidate_profile(&user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_profile_signs_out() {
    let app = common::create_test_app();
    let session = common::signed_in_user(&app, "cand@example.com", Some(Role::Candidate)).await;

    let response = app
        .app()
        .oneshot(authed("DELETE", "/profile", &session.access_token, Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(app
        .db
        .get_candidate_profile(&session.user.id)
        .await
        .unwrap()
        .is_none());
    assert!(app
        .auth
        .get_user(&session.access_token)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_backend_outage_is_a_gateway_error() {
    let app = common::create_test_app();
    let session = common::signed_in_user(&app, "cand@example.com", Some(Role::Candidate)).await;
    app.db.set_offline(true);

    let response = app
        .app()
        .oneshot(authed("GET", "/profile", &session.access_token, Body::empty()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_public_profile_shows_candidate_and_resume() {
    let app = common::create_test_app();
    let candidate = common::signed_in_user(&app, "cand@example.com", Some(Role::Candidate)).await;
    let viewer = common::signed_in_user(&app, "hire@example.com", Some(Role::Recruiter)).await;

    app.app()
        .oneshot(authed(
            "PUT",
            "/resume",
            &candidate.access_token,
            Body::from(r#"{"skills":["Rust"]}"#),
        ))
        .await
        .unwrap();

    let response = app
        .app()
        .oneshot(authed(
            "GET",
            &format!("/profiles/{}", candidate.user.id),
            &viewer.access_token,
            Body::empty(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["profile"]["first_name"], "Test");
    assert_eq!(body["resume"]["skills"][0], "Rust");

    // Recruiter rows have no public page.
    let response = app
        .app()
        .oneshot(authed(
            "GET",
            &format!("/profiles/{}", viewer.user.id),
            &candidate.access_token,
            Body::empty(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
