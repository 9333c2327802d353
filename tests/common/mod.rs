// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use career_reco::config::Config;
use career_reco::db::MemoryDb;
use career_reco::error::{AppError, Result};
use career_reco::models::{
    CandidateMatch, CandidateProfile, RecommendRequest, RecruiterProfile, ResumeContent, Role,
    Session, UserMetadata,
};
use career_reco::routes::create_router;
use career_reco::services::{
    Embedding, EmbeddingService, MatchingService, MemoryAuth, MemoryStorage,
};
use career_reco::AppState;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SIGNING_KEY: &[u8] = b"test-signing-key";

/// Embedding service that returns a fixed vector or fails on demand.
#[derive(Default)]
pub struct ScriptedEmbeddings {
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingService for ScriptedEmbeddings {
    async fn embed(&self, _content: &ResumeContent) -> Result<Embedding> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Embedding("service unavailable".to_string()));
        }
        Ok(Embedding::new(vec![0, 1, 2, 3, 254, 255]))
    }
}

/// Matching service returning a fixed candidate pool, optionally delayed per query.
#[derive(Default)]
pub struct ScriptedMatcher {
    pub pool: Vec<CandidateMatch>,
    pub delays: HashMap<String, Duration>,
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
    pub queries: Mutex<Vec<String>>,
}

impl ScriptedMatcher {
    pub fn with_pool(size: usize) -> Self {
        Self {
            pool: candidate_pool(size),
            ..Default::default()
        }
    }

    pub fn delay(mut self, job_description: &str, delay: Duration) -> Self {
        self.delays.insert(job_description.to_string(), delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchingService for ScriptedMatcher {
    async fn recommend(&self, request: &RecommendRequest) -> Result<Vec<CandidateMatch>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .unwrap()
            .push(request.job_description.clone());

        if let Some(delay) = self.delays.get(&request.job_description) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Recommender(
                "An error occurred while fetching recommendations".to_string(),
            ));
        }

        // Tag results with the query so tests can tell responses apart.
        Ok(self
            .pool
            .iter()
            .cloned()
            .map(|mut m| {
                m.education = request.job_description.clone();
                m
            })
            .collect())
    }
}

/// Unordered pool with distinct scores.
pub fn candidate_pool(size: usize) -> Vec<CandidateMatch> {
    (0..size)
        .map(|i| CandidateMatch {
            id: format!("cand-{i}"),
            name: format!("Candidate {i}"),
            email: format!("cand{i}@example.com"),
            phone: String::new(),
            // Interleaved so the pool is not already sorted
            score: ((i * 7) % size) as f64 / size as f64,
            skills: vec!["Go".to_string()],
            experience: Vec::new(),
            education: String::new(),
            languages: Vec::new(),
            certifications: Vec::new(),
            age: None,
        })
        .collect()
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub auth: Arc<MemoryAuth>,
    pub db: Arc<MemoryDb>,
    pub storage: Arc<MemoryStorage>,
    pub embeddings: Arc<ScriptedEmbeddings>,
    pub matcher: Arc<ScriptedMatcher>,
}

impl TestApp {
    /// Router clone for a single `oneshot` call.
    #[allow(dead_code)]
    pub fn app(&self) -> axum::Router {
        self.router.clone()
    }
}

/// Create a test app with offline in-memory dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with_matcher(ScriptedMatcher::with_pool(8))
}

#[allow(dead_code)]
pub fn create_test_app_with_matcher(matcher: ScriptedMatcher) -> TestApp {
    let config = Config::test_default();
    let auth = Arc::new(MemoryAuth::new(SIGNING_KEY));
    let db = Arc::new(MemoryDb::new());
    let storage = Arc::new(MemoryStorage::new(&format!(
        "{}/storage/v1/object/public/{}",
        config.supabase_url, config.avatar_bucket
    )));
    let embeddings = Arc::new(ScriptedEmbeddings::default());
    let matcher = Arc::new(matcher);

    let state = Arc::new(AppState::new(
        config,
        auth.clone(),
        db.clone(),
        db.clone(),
        storage.clone(),
        embeddings.clone(),
        matcher.clone(),
    ));

    TestApp {
        router: create_router(state.clone()),
        state,
        auth,
        db,
        storage,
        embeddings,
        matcher,
    }
}

/// Register a user with `role` in metadata and a matching profile row; return a live session.
#[allow(dead_code)]
pub async fn signed_in_user(app: &TestApp, email: &str, role: Option<Role>) -> Session {
    use career_reco::db::ProfileStore;

    let user = app.auth.insert_user(
        email,
        "password1",
        UserMetadata {
            role,
            account_type: role.map(|r| r.as_str().to_string()),
            ..Default::default()
        },
    );

    match role {
        Some(Role::Recruiter) => app
            .db
            .upsert_recruiter_profile(&RecruiterProfile {
                id: user.id.clone(),
                email: user.email.clone(),
                role,
                company: "Acme".to_string(),
                ..Default::default()
            })
            .await
            .unwrap(),
        Some(_) => app
            .db
            .upsert_candidate_profile(&CandidateProfile {
                id: user.id.clone(),
                email: user.email.clone(),
                role,
                first_name: "Test".to_string(),
                ..Default::default()
            })
            .await
            .unwrap(),
        None => {}
    }

    app.auth.issue_session(&user).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
