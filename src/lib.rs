// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Career-Reco: recruiting platform front-end services
//!
//! This crate provides the browser-facing API (signup, profiles, resumes,
//! recommendations) over a hosted backend-as-a-service, plus the headless
//! client core the web shell drives.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod navigation;
pub mod routes;
pub mod services;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use db::{ProfileStore, ResumeStore};
use services::{
    AuthProvider, EmbeddingService, MatchingService, ObjectStorage, ResumeService, RoleResolver,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub auth: Arc<dyn AuthProvider>,
    pub profiles: Arc<dyn ProfileStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub matcher: Arc<dyn MatchingService>,
    pub roles: RoleResolver,
    pub resumes: ResumeService,
}

impl AppState {
    pub fn new(
        config: Config,
        auth: Arc<dyn AuthProvider>,
        profiles: Arc<dyn ProfileStore>,
        resumes: Arc<dyn ResumeStore>,
        storage: Arc<dyn ObjectStorage>,
        embeddings: Arc<dyn EmbeddingService>,
        matcher: Arc<dyn MatchingService>,
    ) -> Self {
        Self {
            config,
            auth,
            roles: RoleResolver::new(profiles.clone()),
            profiles,
            storage,
            matcher,
            resumes: ResumeService::new(resumes, embeddings),
        }
    }
}
