// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process auth provider for offline development and tests.
//!
//! Issues HS256 access tokens signed with a local key. Identities live in
//! memory and vanish with the process.

use async_trait::async_trait;
use dashmap::DashMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{AppError, Result};
use crate::models::{AuthUser, Claims, Session, UserMetadata};
use crate::services::auth::{AuthProvider, Credentials, SignUpOutcome};

const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

struct StoredUser {
    user: AuthUser,
    password: String,
}

/// Auth provider backed by process memory.
pub struct MemoryAuth {
    signing_key: Vec<u8>,
    token_ttl_secs: i64,
    /// Keyed by lowercase email
    users: DashMap<String, StoredUser>,
    /// refresh token -> user id
    refresh_tokens: DashMap<String, String>,
    revoked: DashMap<String, ()>,
}

impl MemoryAuth {
    pub fn new(signing_key: &[u8]) -> Self {
        Self {
            signing_key: signing_key.to_vec(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            users: DashMap::new(),
            refresh_tokens: DashMap::new(),
            revoked: DashMap::new(),
        }
    }

    pub fn with_token_ttl(mut self, secs: i64) -> Self {
        self.token_ttl_secs = secs;
        self
    }

    /// Register an identity directly, bypassing sign-up. Returns the new user.
    pub fn insert_user(&self, email: &str, password: &str, metadata: UserMetadata) -> AuthUser {
        let user = AuthUser {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            user_metadata: metadata,
        };
        self.users.insert(
            email.to_ascii_lowercase(),
            StoredUser {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        user
    }

    /// Issue a fresh session for a known user.
    pub fn issue_session(&self, user: &AuthUser) -> Result<Session> {
        let now = chrono::Utc::now().timestamp();
        let expires_at = now + self.token_ttl_secs;
        let access_token = create_jwt(user, &self.signing_key, now, expires_at)?;
        let refresh_token = uuid::Uuid::new_v4().to_string();
        self.refresh_tokens
            .insert(refresh_token.clone(), user.id.clone());

        Ok(Session {
            access_token,
            refresh_token,
            user: user.clone(),
            issued_at: now,
            expires_at,
        })
    }

    fn find_by_id(&self, user_id: &str) -> Option<AuthUser> {
        self.users
            .iter()
            .find(|entry| entry.value().user.id == user_id)
            .map(|entry| entry.value().user.clone())
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>> {
        if self.revoked.contains_key(access_token) {
            return Ok(None);
        }

        let key = DecodingKey::from_secret(&self.signing_key);
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = match decode::<Claims>(access_token, &key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected access token");
                return Ok(None);
            }
        };

        Ok(self.find_by_id(&claims.sub))
    }

    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session> {
        let user = match self.users.get(&credentials.email.to_ascii_lowercase()) {
            Some(stored) if stored.password == credentials.password => stored.user.clone(),
            _ => return Err(AppError::Unauthorized),
        };
        self.issue_session(&user)
    }

    async fn sign_up(
        &self,
        credentials: &Credentials,
        metadata: &UserMetadata,
    ) -> Result<SignUpOutcome> {
        if self
            .users
            .contains_key(&credentials.email.to_ascii_lowercase())
        {
            return Err(AppError::AuthProvider("User already registered".to_string()));
        }

        let user = self.insert_user(&credentials.email, &credentials.password, metadata.clone());
        let session = self.issue_session(&user)?;
        Ok(SignUpOutcome {
            user,
            session: Some(session),
        })
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session> {
        let (_, user_id) = self
            .refresh_tokens
            .remove(refresh_token)
            .ok_or(AppError::SessionExpired)?;
        let user = self.find_by_id(&user_id).ok_or(AppError::SessionExpired)?;
        self.issue_session(&user)
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        self.revoked.insert(access_token.to_string(), ());
        Ok(())
    }
}

/// Create a signed access token for a user session.
pub fn create_jwt(
    user: &AuthUser,
    signing_key: &[u8],
    issued_at: i64,
    expires_at: i64,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        iat: issued_at as usize,
        exp: expires_at as usize,
        user_metadata: user.user_metadata.clone(),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
