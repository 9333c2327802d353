// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Candidate search for recruiters.

use axum::{extract::State, routing::post, Extension, Json, Router};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::recommendation::rank;
use crate::models::{AuthUser, CandidateMatch, RecommendRequest};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/recommend", post(recommend))
}

async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<Vec<CandidateMatch>>> {
    let request = RecommendRequest::new(request.job_description.trim(), request.top_n);
    request.validate()?;
    if request.top_n == 0 {
        return Err(AppError::BadRequest("top_n must be at least 1".to_string()));
    }

    tracing::info!(user_id = %user.id, top_n = request.top_n, "Recommendation search");
    let matches = state.matcher.recommend(&request).await?;
    Ok(Json(rank(matches, request.top_n)))
}
