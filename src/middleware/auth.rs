// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route guard middleware.
//!
//! Every guarded request resolves the caller through the auth provider; no
//! cached identity is trusted. The decision itself is the pure [`evaluate`]
//! so the client shell can apply the same rule before navigating.
//!
//! Role-restricted groups take a second step: the metadata role must admit
//! the requirement, and the id must resolve to exactly one profile table
//! ([`confirm_role`]).

use crate::config::SESSION_COOKIE;
use crate::error::AppError;
use crate::models::AuthUser;
use crate::navigation::{login_redirect, Access};
use crate::services::roles::RoleResolution;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Raw access token of the authenticated caller.
#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

/// Outcome of checking a visitor against a route's access level.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    Admit,
    RedirectToLogin,
    AccessDenied,
}

/// Decide whether `user` may see a view requiring `access`.
///
/// Only identity metadata is consulted for the role, matching what the
/// provider returns at activation time.
pub fn evaluate(user: Option<&AuthUser>, access: Access) -> GuardDecision {
    let user = match (access, user) {
        (Access::Public, _) => return GuardDecision::Admit,
        (_, None) => return GuardDecision::RedirectToLogin,
        (_, Some(user)) => user,
    };

    match access {
        Access::Public | Access::Authenticated => GuardDecision::Admit,
        Access::AnyRole if user.metadata_role().is_some() => GuardDecision::Admit,
        Access::Role(required) if user.metadata_role().is_some_and(|r| r.admits(required)) => {
            GuardDecision::Admit
        }
        _ => GuardDecision::AccessDenied,
    }
}

/// Whether `access` also needs a profile-table lookup after [`evaluate`] admits.
pub fn needs_role_lookup(access: Access) -> bool {
    matches!(access, Access::Role(_))
}

/// Second gate for role-restricted views. Ids found in neither table, or in
/// both, hold no role and are denied.
pub fn confirm_role(resolution: &RoleResolution) -> GuardDecision {
    match resolution.role() {
        Some(_) => GuardDecision::Admit,
        None => GuardDecision::AccessDenied,
    }
}

/// Session cookie first, then `Authorization: Bearer`.
pub fn extract_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// State handed to [`require_access`]: the app plus the level this route group needs.
#[derive(Clone)]
pub struct GuardState {
    pub app: Arc<AppState>,
    pub access: Access,
}

impl GuardState {
    pub fn new(app: Arc<AppState>, access: Access) -> Self {
        Self { app, access }
    }
}

/// Middleware gating a route group on its access level.
pub async fn require_access(
    State(guard): State<GuardState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let original = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let token = extract_token(&jar, request.headers());
    let user = match &token {
        Some(token) => match guard.app.auth.get_user(token).await {
            Ok(user) => user,
            Err(e) => {
                // Treated the same as no session
                tracing::warn!(path = %original, error = %e, "User lookup failed");
                None
            }
        },
        None => None,
    };

    let mut decision = evaluate(user.as_ref(), guard.access);
    if let (GuardDecision::Admit, Some(user)) = (&decision, &user) {
        if needs_role_lookup(guard.access) {
            decision = match guard.app.roles.resolve(&user.id).await {
                Ok(resolution) => {
                    if resolution.is_conflict() {
                        tracing::warn!(user_id = %user.id, path = %original, "Conflicting profile rows, denying");
                    }
                    confirm_role(&resolution)
                }
                Err(e) => {
                    tracing::warn!(user_id = %user.id, error = %e, "Role lookup failed");
                    GuardDecision::RedirectToLogin
                }
            };
        }
    }

    match decision {
        GuardDecision::Admit => {
            if let (Some(user), Some(token)) = (user, token) {
                request.extensions_mut().insert(user);
                request.extensions_mut().insert(AccessToken(token));
            }
            next.run(request).await
        }
        GuardDecision::RedirectToLogin => {
            tracing::debug!(path = %original, "No session, redirecting to login");
            Redirect::to(&login_redirect(&original)).into_response()
        }
        GuardDecision::AccessDenied => {
            tracing::info!(
                path = %original,
                user_id = user.as_ref().map(|u| u.id.as_str()).unwrap_or(""),
                "Access denied"
            );
            AppError::AccessDenied(format!("{:?} required", guard.access)).into_response()
        }
    }
}
