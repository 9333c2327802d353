// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile page reads and writes, avatar upload and profile completion.
//!
//! The table is chosen from the role in identity metadata: recruiters use
//! `recruiter_profiles`, everyone else `profiles`.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::config::SESSION_COOKIE;
use crate::error::{AppError, Result};
use crate::middleware::auth::AccessToken;
use crate::models::{
    AuthUser, CandidateProfile, Profile, ProfileUpdate, RecruiterProfile, ResumeContent, Role,
};
use crate::services::storage::{avatar_path, content_type_for};
use crate::time_utils::{format_utc_rfc3339, unix_millis};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/profile",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route("/profile/avatar", post(upload_avatar))
        .route("/profiles/{user_id}", get(get_public_profile))
}

/// Routes that need a role in identity metadata.
pub fn completion_routes() -> Router<Arc<AppState>> {
    Router::new().route("/complete-profile", post(complete_profile))
}

fn profile_role(user: &AuthUser) -> Role {
    match user.metadata_role() {
        Some(Role::Recruiter) => Role::Recruiter,
        _ => Role::Candidate,
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub role: Role,
    pub profile: Profile,
    /// False when no row exists yet and `profile` holds placeholders.
    pub profile_complete: bool,
    pub resume: Option<ResumeContent>,
}

/// Placeholder row shown until the user completes their profile.
fn placeholder(user: &AuthUser, role: Role) -> Profile {
    match role {
        Role::Recruiter => Profile::Recruiter(RecruiterProfile {
            id: user.id.clone(),
            email: user.email.clone(),
            role: Some(role),
            company: "Not specified".to_string(),
            ..Default::default()
        }),
        _ => Profile::Candidate(CandidateProfile {
            id: user.id.clone(),
            email: user.email.clone(),
            role: Some(role),
            first_name: user.user_metadata.first_name.clone().unwrap_or_default(),
            last_name: user.user_metadata.last_name.clone().unwrap_or_default(),
            ..Default::default()
        }),
    }
}

async fn load_profile(state: &AppState, user_id: &str, role: Role) -> Result<Option<Profile>> {
    Ok(match role {
        Role::Recruiter => state
            .profiles
            .get_recruiter_profile(user_id)
            .await?
            .map(Profile::Recruiter),
        _ => state
            .profiles
            .get_candidate_profile(user_id)
            .await?
            .map(Profile::Candidate),
    })
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileView>> {
    let role = profile_role(&user);
    let stored = load_profile(&state, &user.id, role).await?;
    let profile_complete = stored.is_some();

    // The resume is a secondary panel; failing to load it must not fail the page.
    let resume = if role == Role::Candidate {
        match state.resumes.get(&user.id).await {
            Ok(resume) => resume.map(|r| r.content),
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Resume fetch failed");
                None
            }
        }
    } else {
        None
    };

    Ok(Json(ProfileView {
        role,
        profile: stored.unwrap_or_else(|| placeholder(&user, role)),
        profile_complete,
        resume,
    }))
}

#[derive(Debug, Serialize)]
pub struct PublicProfileView {
    pub profile: CandidateProfile,
    pub resume: Option<ResumeContent>,
}

/// A candidate's page as other signed-in users see it.
async fn get_public_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<PublicProfileView>> {
    let profile = state
        .profiles
        .get_candidate_profile(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    let resume = state.resumes.get(&user_id).await?.map(|r| r.content);
    Ok(Json(PublicProfileView { profile, resume }))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Profile>> {
    update.validate()?;
    let role = profile_role(&user);

    match role {
        Role::Recruiter => {
            state
                .profiles
                .update_recruiter_profile(&user.id, &update)
                .await?
        }
        _ => {
            state
                .profiles
                .update_candidate_profile(&user.id, &update)
                .await?
        }
    }

    let profile = load_profile(&state, &user.id, role)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    tracing::info!(user_id = %user.id, role = %role, "Profile updated");
    Ok(Json(profile))
}

/// Delete the candidate profile, then end the session.
async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Extension(AccessToken(token)): Extension<AccessToken>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar)> {
    state.profiles.delete_candidate_profile(&user.id).await?;
    tracing::info!(user_id = %user.id, "Profile deleted");

    if let Err(e) = state.auth.sign_out(&token).await {
        tracing::warn!(user_id = %user.id, error = %e, "Sign-out after profile deletion failed");
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((StatusCode::NO_CONTENT, jar))
}

#[derive(Debug, Deserialize)]
pub struct AvatarParams {
    ext: String,
}

#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub url: String,
}

/// Raw image body stored under `<millis>.<ext>` in the avatar bucket.
async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<AvatarParams>,
    body: Bytes,
) -> Result<Json<AvatarResponse>> {
    if body.is_empty() {
        return Err(AppError::BadRequest("Empty image upload".to_string()));
    }

    let path = avatar_path(&params.ext, unix_millis(chrono::Utc::now()))?;
    let url = state
        .storage
        .upload(&path, content_type_for(&path), body.to_vec())
        .await?;

    tracing::info!(user_id = %user.id, path = %path, "Avatar uploaded");
    Ok(Json(AvatarResponse { url }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompleteProfileRequest {
    #[serde(default)]
    #[validate(url)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

async fn complete_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CompleteProfileRequest>,
) -> Result<Json<Profile>> {
    body.validate()?;
    let role = profile_role(&user);
    let now = Some(format_utc_rfc3339(chrono::Utc::now()));

    let profile = match role {
        Role::Recruiter => {
            let mut row = state
                .profiles
                .get_recruiter_profile(&user.id)
                .await?
                .unwrap_or_default();
            row.id = user.id.clone();
            row.email = user.email.clone();
            row.role.get_or_insert(role);
            row.profile_picture = body.profile_picture.clone().or(row.profile_picture);
            if let Some(company) = &body.company {
                row.company = company.clone();
            }
            row.created_at = row.created_at.or_else(|| now.clone());
            row.updated_at = now;
            state.profiles.upsert_recruiter_profile(&row).await?;
            Profile::Recruiter(row)
        }
        _ => {
            let mut row = state
                .profiles
                .get_candidate_profile(&user.id)
                .await?
                .unwrap_or_default();
            row.id = user.id.clone();
            row.email = user.email.clone();
            row.role.get_or_insert(role);
            row.profile_picture = body.profile_picture.clone().or(row.profile_picture);
            if let Some(first_name) = &body.first_name {
                row.first_name = first_name.clone();
            }
            if let Some(last_name) = &body.last_name {
                row.last_name = last_name.clone();
            }
            row.created_at = row.created_at.or_else(|| now.clone());
            row.updated_at = now;
            state.profiles.upsert_candidate_profile(&row).await?;
            Profile::Candidate(row)
        }
    };

    tracing::info!(user_id = %user.id, role = %role, "Profile completed");
    Ok(Json(profile))
}
