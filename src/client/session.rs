// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session store: the client's view of who is signed in.
//!
//! Lifecycle:
//! 1. `init` fetches the current session, subscribes to auth events and
//!    announces the starting session as `InitialSession`
//! 2. a background task applies each event and refreshes ahead of expiry
//! 3. `shutdown` (or drop) stops the task and releases the subscription
//!
//! Losing the session while the visitor is on a protected route marks it
//! expired and navigates to the login view with the expiry notice.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::client::auth_client::AuthClient;
use crate::models::Session;
use crate::navigation::{is_public, Navigation};
use crate::services::auth::AuthEvent;

/// How long before `expires_at` the store asks for a fresh token.
pub const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Receives navigation requests from the client core.
pub trait Navigator: Send + Sync {
    fn navigate(&self, navigation: Navigation);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    SignedOut,
    /// The session ended while a protected view was showing.
    Expired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub session: Option<Session>,
    pub status: SessionStatus,
}

impl SessionState {
    fn from_session(session: Option<Session>) -> Self {
        let status = if session.is_some() {
            SessionStatus::Active
        } else {
            SessionStatus::SignedOut
        };
        Self { session, status }
    }
}

struct Shared {
    auth: Arc<AuthClient>,
    navigator: Arc<dyn Navigator>,
    route: Mutex<String>,
    state: watch::Sender<SessionState>,
}

impl Shared {
    fn apply(&self, event: AuthEvent) {
        tracing::debug!(kind = ?event.kind, has_session = event.session.is_some(), "Auth event");

        let Some(session) = event.session else {
            self.signed_out();
            return;
        };

        self.state.send_replace(SessionState {
            session: Some(session),
            status: SessionStatus::Active,
        });
    }

    fn signed_out(&self) {
        let had_session = self.state.borrow().session.is_some();
        let route = self
            .route
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if had_session && !is_public(&route) {
            tracing::info!(route = %route, "Session ended on protected route");
            self.state.send_replace(SessionState {
                session: None,
                status: SessionStatus::Expired,
            });
            self.navigator.navigate(Navigation::login_expired());
        } else {
            self.state.send_replace(SessionState::from_session(None));
        }
    }

    fn refresh_delay(&self) -> Option<Duration> {
        let state = self.state.borrow();
        let session = state.session.as_ref()?;
        let secs = session.seconds_until_refresh(
            Utc::now().timestamp(),
            REFRESH_MARGIN.as_secs() as i64,
        );
        Some(Duration::from_secs(secs as u64))
    }
}

pub struct SessionStore {
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SessionStore {
    /// Fetch the current session and start tracking changes.
    ///
    /// A provider failure here is logged and treated as "no session".
    pub async fn init(
        auth: Arc<AuthClient>,
        navigator: Arc<dyn Navigator>,
        route: &str,
    ) -> Self {
        // Subscribe before fetching so no change slips between the two.
        let events = auth.subscribe();

        let session = match auth.get_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch session, treating as signed out");
                None
            }
        };

        auth.announce_initial(session.clone());

        let (state, _) = watch::channel(SessionState::from_session(session));
        let shared = Arc::new(Shared {
            auth,
            navigator,
            route: Mutex::new(route.to_string()),
            state,
        });

        let task = tokio::spawn(run(shared.clone(), events));

        Self {
            shared,
            task: Mutex::new(Some(task)),
        }
    }

    /// Stop listening for auth events. Idempotent.
    pub fn shutdown(&self) {
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
            tracing::debug!("Session store stopped");
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.shared.state.borrow().session.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.shared.state.borrow().status
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state.subscribe()
    }

    /// Record the view the visitor is on.
    pub fn set_route(&self, path: &str) {
        *self
            .shared
            .route
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = path.to_string();
    }

    pub fn route(&self) -> String {
        self.shared
            .route
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn auth(&self) -> &Arc<AuthClient> {
        &self.shared.auth
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run(shared: Arc<Shared>, mut events: broadcast::Receiver<AuthEvent>) {
    loop {
        let delay = shared.refresh_delay();
        let refresh_due = async {
            match delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => shared.apply(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Auth events dropped, resyncing from cache");
                    let session = shared.auth.cached();
                    match session {
                        Some(session) => {
                            shared.state.send_replace(SessionState::from_session(Some(session)));
                        }
                        None => shared.signed_out(),
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = refresh_due => {
                // Failure emits a sign-out event, handled on the next turn.
                if let Err(e) = shared.auth.refresh().await {
                    tracing::warn!(error = %e, "Automatic session refresh failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserMetadata;
    use crate::services::{Credentials, MemoryAuth};

    #[derive(Default)]
    struct RecordingNavigator {
        seen: Mutex<Vec<Navigation>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, navigation: Navigation) {
            self.seen.lock().unwrap().push(navigation);
        }
    }

    async fn signed_in(ttl_secs: i64) -> (Arc<AuthClient>, Arc<RecordingNavigator>) {
        let provider = Arc::new(MemoryAuth::new(b"test-key").with_token_ttl(ttl_secs));
        provider.insert_user("c@example.com", "secret1", UserMetadata::default());
        let auth = Arc::new(AuthClient::new(provider));
        auth.sign_in(&Credentials {
            email: "c@example.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();
        (auth, Arc::new(RecordingNavigator::default()))
    }

    #[tokio::test]
    async fn test_init_picks_up_existing_session() {
        let (auth, navigator) = signed_in(3600).await;
        let store = SessionStore::init(auth, navigator, "/").await;
        assert_eq!(store.status(), SessionStatus::Active);
        assert!(store.current().is_some());
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let (auth, navigator) = signed_in(3600).await;
        let store = SessionStore::init(auth.clone(), navigator.clone(), "/profile").await;
        store.shutdown();
        store.shutdown();

        auth.expire();
        tokio::task::yield_now().await;
        assert!(navigator.seen.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_ahead_of_expiry() {
        let (auth, navigator) = signed_in(120).await;
        let store = SessionStore::init(auth, navigator, "/profile").await;
        let before = store.current().unwrap().refresh_token;
        let mut changes = store.subscribe();

        changes.changed().await.unwrap();

        let after = changes.borrow().clone();
        assert_eq!(after.status, SessionStatus::Active);
        assert_ne!(after.session.unwrap().refresh_token, before);
    }
}
