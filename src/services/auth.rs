// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth provider seam and the hosted (GoTrue-compatible) implementation.
//!
//! The provider owns identities and token issuance. This crate only calls it:
//! - password sign-in / sign-up with role metadata
//! - user lookup by access token (used by the route guard)
//! - refresh and sign-out

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{AuthUser, Claims, Session, UserMetadata};
use crate::services::supabase::{check_response, check_response_json, send, SupabaseHttp};

/// Email + password pair for sign-in and sign-up.
#[derive(Debug, Clone, Serialize, Deserialize, validator::Validate)]
pub struct Credentials {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

/// Result of a sign-up. Providers that require email confirmation return no session.
#[derive(Debug, Clone)]
pub struct SignUpOutcome {
    pub user: AuthUser,
    pub session: Option<Session>,
}

/// Kind of session change announced to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEventKind {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Session-change notification. `session` is `None` once the identity is gone.
#[derive(Debug, Clone)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub session: Option<Session>,
}

/// Operations consumed from the external auth provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve the identity behind an access token.
    ///
    /// Returns `Ok(None)` when the provider rejects the token.
    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>>;

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session>;

    async fn sign_up(
        &self,
        credentials: &Credentials,
        metadata: &UserMetadata,
    ) -> Result<SignUpOutcome>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session>;

    async fn sign_out(&self, access_token: &str) -> Result<()>;
}

/// Token grant response from the provider.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let now = Utc::now().timestamp();
        let claims = Claims::peek(&self.access_token).ok();

        let issued_at = claims.as_ref().map(|c| c.iat as i64).unwrap_or(now);
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|secs| now + secs))
            .or_else(|| claims.as_ref().map(|c| c.exp as i64))
            .unwrap_or(now);

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            user: self.user,
            issued_at,
            expires_at,
        }
    }
}

/// Hosted auth provider client.
#[derive(Clone)]
pub struct SupabaseAuth {
    http: SupabaseHttp,
}

impl SupabaseAuth {
    pub fn new(http: SupabaseHttp) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>> {
        let response = send(
            self.http
                .request_as(Method::GET, "/auth/v1/user", access_token),
            AppError::AuthProvider,
        )
        .await?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            tracing::debug!(status, "Access token rejected by auth provider");
            return Ok(None);
        }

        check_response_json(response, AppError::AuthProvider)
            .await
            .map(Some)
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session> {
        let response = send(
            self.http
                .request(Method::POST, "/auth/v1/token?grant_type=password")
                .json(&serde_json::json!({
                    "email": credentials.email,
                    "password": credentials.password,
                })),
            AppError::AuthProvider,
        )
        .await?;

        let status = response.status().as_u16();
        if status == 400 || status == 401 {
            tracing::info!(email = %credentials.email, "Password sign-in rejected");
            return Err(AppError::Unauthorized);
        }

        let token: TokenResponse = check_response_json(response, AppError::AuthProvider).await?;
        Ok(token.into_session())
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        metadata: &UserMetadata,
    ) -> Result<SignUpOutcome> {
        let response = send(
            self.http
                .request(Method::POST, "/auth/v1/signup")
                .json(&serde_json::json!({
                    "email": credentials.email,
                    "password": credentials.password,
                    "data": metadata,
                })),
            AppError::AuthProvider,
        )
        .await?;

        let body: serde_json::Value = check_response_json(response, AppError::AuthProvider).await?;

        // With auto-confirm the provider returns a full token grant; otherwise just the user.
        if body.get("access_token").is_some() {
            let token: TokenResponse = serde_json::from_value(body)
                .map_err(|e| AppError::AuthProvider(format!("JSON parse error: {}", e)))?;
            let session = token.into_session();
            return Ok(SignUpOutcome {
                user: session.user.clone(),
                session: Some(session),
            });
        }

        let user_value = body.get("user").cloned().unwrap_or(body);
        let user: AuthUser = serde_json::from_value(user_value)
            .map_err(|e| AppError::AuthProvider(format!("JSON parse error: {}", e)))?;
        Ok(SignUpOutcome {
            user,
            session: None,
        })
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session> {
        let response = send(
            self.http
                .request(Method::POST, "/auth/v1/token?grant_type=refresh_token")
                .json(&serde_json::json!({ "refresh_token": refresh_token })),
            AppError::AuthProvider,
        )
        .await?;

        let status = response.status().as_u16();
        if status == 400 || status == 401 {
            return Err(AppError::SessionExpired);
        }

        let token: TokenResponse = check_response_json(response, AppError::AuthProvider).await?;
        Ok(token.into_session())
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = send(
            self.http
                .request_as(Method::POST, "/auth/v1/logout", access_token),
            AppError::AuthProvider,
        )
        .await?;

        // An already-invalid token is as signed out as it gets.
        if response.status().as_u16() == 401 {
            return Ok(());
        }
        check_response(response, AppError::AuthProvider).await?;
        Ok(())
    }
}
