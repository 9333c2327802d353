// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recommendation (resume matching) API client.

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::recommendation::rank;
use crate::models::{CandidateMatch, RecommendRequest};
use crate::services::supabase::error_message;

/// Ranks stored resumes against a job description.
#[async_trait]
pub trait MatchingService: Send + Sync {
    async fn recommend(&self, request: &RecommendRequest) -> Result<Vec<CandidateMatch>>;
}

/// HTTP client for `POST <base>/recommend/`.
#[derive(Clone)]
pub struct RecommenderClient {
    http: reqwest::Client,
    base_url: String,
}

impl RecommenderClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MatchingService for RecommenderClient {
    async fn recommend(&self, request: &RecommendRequest) -> Result<Vec<CandidateMatch>> {
        let url = format!("{}/recommend/", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Recommender(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body).unwrap_or_else(|| {
                format!(
                    "An error occurred while fetching recommendations (HTTP {})",
                    status
                )
            });
            return Err(AppError::Recommender(message));
        }

        let matches: Vec<CandidateMatch> = response
            .json()
            .await
            .map_err(|e| AppError::Recommender(format!("JSON parse error: {}", e)))?;

        tracing::info!(
            top_n = request.top_n,
            returned = matches.len(),
            "Received recommendations"
        );

        Ok(rank(matches, request.top_n))
    }
}
