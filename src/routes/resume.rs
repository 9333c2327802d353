// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resume builder endpoints for the signed-in user.

use axum::{extract::State, http::StatusCode, routing::get, Extension, Json, Router};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{AuthUser, Resume, ResumeContent};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/resume",
        get(get_resume).put(submit_resume).delete(delete_resume),
    )
}

async fn get_resume(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Resume>> {
    state
        .resumes
        .get(&user.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No resume yet".to_string()))
}

/// Embed and store the submitted content, replacing any earlier resume.
async fn submit_resume(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(content): Json<ResumeContent>,
) -> Result<Json<Resume>> {
    let resume = state.resumes.submit(&user.id, &content).await?;
    Ok(Json(resume))
}

async fn delete_resume(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode> {
    state.resumes.delete(&user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
