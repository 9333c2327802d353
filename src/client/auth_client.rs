// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side handle on the auth provider.
//!
//! Holds the locally cached session and announces every change on a
//! broadcast channel, the way the hosted SDK's `onAuthStateChange` does.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use tokio::sync::broadcast;

use crate::error::{AppError, Result};
use crate::models::{Session, UserMetadata};
use crate::services::auth::{AuthEvent, AuthEventKind, AuthProvider, Credentials, SignUpOutcome};

const EVENT_CAPACITY: usize = 16;

pub struct AuthClient {
    provider: Arc<dyn AuthProvider>,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

impl AuthClient {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            provider,
            session: RwLock::new(None),
            events,
        }
    }

    /// Start from a session restored by the shell (for example from local storage).
    pub fn with_session(self, session: Session) -> Self {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        self
    }

    pub fn provider(&self) -> &Arc<dyn AuthProvider> {
        &self.provider
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Cached session without any provider round trip.
    pub fn cached(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current session, refreshed first if the cached one has expired.
    pub async fn get_session(&self) -> Result<Option<Session>> {
        let Some(session) = self.cached() else {
            return Ok(None);
        };

        if session.is_expired_at(Utc::now().timestamp()) {
            tracing::debug!(user_id = session.user_id(), "Cached session expired, refreshing");
            return self.refresh().await.map(Some);
        }

        Ok(Some(session))
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Session> {
        let session = self.provider.sign_in_with_password(credentials).await?;
        tracing::info!(user_id = session.user_id(), "Signed in");
        self.store(AuthEventKind::SignedIn, Some(session.clone()));
        Ok(session)
    }

    pub async fn sign_up(
        &self,
        credentials: &Credentials,
        metadata: &UserMetadata,
    ) -> Result<SignUpOutcome> {
        let outcome = self.provider.sign_up(credentials, metadata).await?;
        tracing::info!(
            user_id = %outcome.user.id,
            confirmed = outcome.session.is_some(),
            "Signed up"
        );
        if let Some(session) = &outcome.session {
            self.store(AuthEventKind::SignedIn, Some(session.clone()));
        }
        Ok(outcome)
    }

    /// Exchange the refresh token. A failed refresh signs the client out.
    pub async fn refresh(&self) -> Result<Session> {
        let Some(current) = self.cached() else {
            return Err(AppError::SessionExpired);
        };

        match self.provider.refresh_session(&current.refresh_token).await {
            Ok(session) => {
                tracing::debug!(user_id = session.user_id(), "Session refreshed");
                self.store(AuthEventKind::TokenRefreshed, Some(session.clone()));
                Ok(session)
            }
            Err(e) => {
                tracing::warn!(user_id = current.user_id(), error = %e, "Session refresh failed");
                self.store(AuthEventKind::SignedOut, None);
                Err(e)
            }
        }
    }

    /// Sign out at the provider. The local session is dropped even if that call fails.
    pub async fn sign_out(&self) -> Result<()> {
        let result = match self.cached() {
            Some(session) => self.provider.sign_out(&session.access_token).await,
            None => Ok(()),
        };
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Provider sign-out failed, clearing local session anyway");
        }
        self.store(AuthEventKind::SignedOut, None);
        result
    }

    /// Drop the local session without contacting the provider.
    pub fn expire(&self) {
        self.store(AuthEventKind::SignedOut, None);
    }

    /// Tell subscribers which session a newly started listener begins from.
    pub fn announce_initial(&self, session: Option<Session>) {
        let _ = self.events.send(AuthEvent {
            kind: AuthEventKind::InitialSession,
            session,
        });
    }

    fn store(&self, kind: AuthEventKind, session: Option<Session>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session.clone();
        // No subscribers is fine
        let _ = self.events.send(AuthEvent { kind, session });
    }
}
