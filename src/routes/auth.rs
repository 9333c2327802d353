// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signup, login, logout and token refresh.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::config::{Config, SESSION_COOKIE};
use crate::error::{AppError, Result};
use crate::middleware::auth::extract_token;
use crate::models::{AuthUser, CandidateProfile, RecruiterProfile, Role, Session, UserMetadata};
use crate::services::Credentials;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup/{role}", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub credentials: Credentials,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    /// Absent when the provider requires email confirmation first.
    pub session: Option<Session>,
}

fn session_cookie(config: &Config, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .build()
}

fn removal_cookie(config: &Config) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .build()
}

/// Create an identity for `role`, then its profile row.
async fn signup(
    State(state): State<Arc<AppState>>,
    Path(role): Path<String>,
    jar: CookieJar,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let role: Role = role
        .parse()
        .map_err(|e: crate::models::role::UnknownRole| AppError::BadRequest(e.to_string()))?;
    if !role.is_self_service() {
        return Err(AppError::BadRequest(format!("Cannot sign up as {}", role)));
    }
    body.validate()?;

    let metadata = UserMetadata {
        role: Some(role),
        account_type: Some(role.as_str().to_string()),
        first_name: body.first_name.clone(),
        last_name: body.last_name.clone(),
    };
    let outcome = state.auth.sign_up(&body.credentials, &metadata).await?;
    let user = outcome.user;
    let created_at = Some(format_utc_rfc3339(chrono::Utc::now()));

    // No transaction spans the identity and the row; a failure here leaves
    // an identity without a profile, which complete-profile repairs.
    match role {
        Role::Recruiter => {
            state
                .profiles
                .upsert_recruiter_profile(&RecruiterProfile {
                    id: user.id.clone(),
                    email: user.email.clone(),
                    role: Some(role),
                    company: body.company.clone().unwrap_or_default(),
                    created_at,
                    ..Default::default()
                })
                .await?
        }
        _ => {
            state
                .profiles
                .upsert_candidate_profile(&CandidateProfile {
                    id: user.id.clone(),
                    email: user.email.clone(),
                    role: Some(role),
                    first_name: body.first_name.clone().unwrap_or_default(),
                    last_name: body.last_name.clone().unwrap_or_default(),
                    created_at,
                    ..Default::default()
                })
                .await?
        }
    }

    tracing::info!(user_id = %user.id, role = %role, "Signup complete");

    let jar = match &outcome.session {
        Some(session) => jar.add(session_cookie(&state.config, session.access_token.clone())),
        None => jar,
    };

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            user,
            session: outcome.session,
        }),
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    credentials.validate()?;

    let session = state.auth.sign_in_with_password(&credentials).await?;
    tracing::info!(user_id = session.user_id(), "User logged in");

    let jar = jar.add(session_cookie(&state.config, session.access_token.clone()));
    Ok((
        jar,
        Json(AuthResponse {
            user: session.user.clone(),
            session: Some(session),
        }),
    ))
}

/// Sign out at the provider and drop the cookie. Always succeeds for the caller.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> (StatusCode, CookieJar) {
    if let Some(token) = extract_token(&jar, &headers) {
        if let Err(e) = state.auth.sign_out(&token).await {
            tracing::warn!(error = %e, "Provider sign-out failed");
        }
    }

    (StatusCode::NO_CONTENT, jar.remove(removal_cookie(&state.config)))
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<RefreshRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    if body.refresh_token.trim().is_empty() {
        return Err(AppError::BadRequest("refresh_token is required".to_string()));
    }

    let session = state.auth.refresh_session(&body.refresh_token).await?;
    tracing::debug!(user_id = session.user_id(), "Session refreshed");

    let jar = jar.add(session_cookie(&state.config, session.access_token.clone()));
    Ok((
        jar,
        Json(AuthResponse {
            user: session.user.clone(),
            session: Some(session),
        }),
    ))
}
