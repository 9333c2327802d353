// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resume submission tests: embedding, upsert semantics and failure handling.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use career_reco::client::{FormStatus, Navigator, ResumeFormController};
use career_reco::db::ResumeStore;
use career_reco::models::Role;
use career_reco::navigation::Navigation;
use career_reco::services::Embedding;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

mod common;

#[derive(Default)]
struct RecordingNavigator {
    seen: Mutex<Vec<Navigation>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, navigation: Navigation) {
        self.seen.lock().unwrap().push(navigation);
    }
}

fn put_resume(token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri("/resume")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_submit_twice_keeps_one_record() {
    let app = common::create_test_app();
    let session = common::signed_in_user(&app, "cand@example.com", Some(Role::Candidate)).await;

    let first = serde_json::json!({
        "education": [{ "institution": "MIT", "degree": "BSc" }],
        "experience": [],
        "skills": ["Go"],
        "languages": ["English"],
        "certifications": [],
    });
    let second = serde_json::json!({
        "education": [],
        "experience": [{
            "company": "Acme",
            "position": "Engineer",
            "start_date": "2020-01",
            "end_date": "2024-06",
            "description": "Backend services",
        }],
        "skills": ["Rust", "Go"],
        "languages": [],
        "certifications": ["CKA"],
    });

    for body in [first, second] {
        let response = app
            .app()
            .oneshot(put_resume(&session.access_token, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(app.db.resume_count(), 1);
    assert_eq!(app.embeddings.calls.load(Ordering::SeqCst), 2);

    let stored = app.db.get_resume(&session.user.id).await.unwrap().unwrap();
    // Full replace: nothing from the first submission survives
    assert!(stored.content.education.is_empty());
    assert_eq!(stored.content.skills, vec!["Rust", "Go"]);
    assert_eq!(stored.content.certifications, vec!["CKA"]);
    assert!(stored.updated_at.is_some());

    let embedding = Embedding::from_base64(&stored.embedding).unwrap();
    assert_eq!(embedding.as_bytes(), &[0, 1, 2, 3, 254, 255]);
}

#[tokio::test]
async fn test_embedding_failure_saves_nothing() {
    let app = common::create_test_app();
    let session = common::signed_in_user(&app, "cand@example.com", Some(Role::Candidate)).await;
    app.embeddings.fail.store(true, Ordering::SeqCst);

    let response = app
        .app()
        .oneshot(put_resume(
            &session.access_token,
            serde_json::json!({ "skills": ["Go"] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "embedding_error");
    assert_eq!(app.db.resume_count(), 0);
}

#[tokio::test]
async fn test_get_and_delete_resume() {
    let app = common::create_test_app();
    let session = common::signed_in_user(&app, "cand@example.com", Some(Role::Candidate)).await;
    let bearer = format!("Bearer {}", session.access_token);

    let response = app
        .app()
        .oneshot(
            Request::builder()
                .uri("/resume")
                .header(header::AUTHORIZATION, &bearer)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.app()
        .oneshot(put_resume(
            &session.access_token,
            serde_json::json!({ "skills": ["SQL"] }),
        ))
        .await
        .unwrap();

    let response = app
        .app()
        .oneshot(
            Request::builder()
                .uri("/resume")
                .header(header::AUTHORIZATION, &bearer)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["skills"][0], "SQL");
    assert!(body["embedding"].is_string());

    let response = app
        .app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/resume")
                .header(header::AUTHORIZATION, &bearer)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.db.resume_count(), 0);
}

#[tokio::test]
async fn test_controller_keeps_draft_on_failure() {
    let app = common::create_test_app();
    let navigator = Arc::new(RecordingNavigator::default());
    let controller =
        ResumeFormController::new(app.state.resumes.clone(), navigator.clone(), "user-1");

    controller.update(|d| d.add_skill("Kotlin").set_languages(["English"]));
    app.embeddings.fail.store(true, Ordering::SeqCst);

    assert!(controller.submit().await.is_err());
    assert!(matches!(controller.status(), FormStatus::Failed(_)));
    assert_eq!(controller.draft().content().skills, vec!["Kotlin"]);
    assert_eq!(app.db.resume_count(), 0);
    assert!(navigator.seen.lock().unwrap().is_empty());

    // Retry after the service recovers
    app.embeddings.fail.store(false, Ordering::SeqCst);
    let saved = controller.submit().await.unwrap();
    assert_eq!(saved.content.skills, vec!["Kotlin"]);
    assert_eq!(controller.status(), FormStatus::Saved);
    assert_eq!(
        navigator.seen.lock().unwrap().as_slice(),
        &[Navigation::to("/profile")]
    );
}

#[tokio::test]
async fn test_controller_loads_stored_resume() {
    let app = common::create_test_app();
    let navigator = Arc::new(RecordingNavigator::default());
    let controller = ResumeFormController::new(app.state.resumes.clone(), navigator, "user-2");

    controller.update(|d| d.add_skill("Go"));
    controller.submit().await.unwrap();

    let reopened = ResumeFormController::new(
        app.state.resumes.clone(),
        Arc::new(RecordingNavigator::default()),
        "user-2",
    );
    reopened.load().await.unwrap();

    let draft = reopened.draft();
    assert_eq!(draft.content().skills, vec!["Go"]);
    // Template entries were submitted as-is and come back unchanged
    assert_eq!(draft.content().education.len(), 1);
    assert_eq!(draft.content().certifications.len(), 1);
    assert_eq!(reopened.status(), FormStatus::Editing);
}
