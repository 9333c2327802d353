// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Headless client core.
//!
//! State machines a rendering shell drives: who is signed in, which role
//! they hold, the resume builder and the recommender search. Nothing here
//! draws anything; navigation is requested through [`Navigator`].

pub mod auth_client;
pub mod recommender;
pub mod resume_form;
pub mod roles;
pub mod session;

pub use auth_client::AuthClient;
pub use recommender::{OrderingPolicy, RecommenderState, RecommenderView};
pub use resume_form::{FormStatus, ListSection, ResumeDraft, ResumeFormController, PREDEFINED_LANGUAGES};
pub use roles::RoleTracker;
pub use session::{Navigator, SessionState, SessionStatus, SessionStore, REFRESH_MARGIN};

use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::{confirm_role, evaluate, needs_role_lookup, GuardDecision};
use crate::navigation::{login_redirect, Navigation, Route};
use crate::services::roles::{RoleResolution, RoleResolver};

/// Session plus role, as the views consume them.
pub struct AuthContext {
    session: SessionStore,
    roles: RoleTracker,
}

impl AuthContext {
    pub fn new(session: SessionStore, resolver: RoleResolver) -> Self {
        Self {
            session,
            roles: RoleTracker::new(resolver),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Role of the current identity, looked up once per identity.
    pub async fn role(&self) -> Result<RoleResolution> {
        let session = self.session.current();
        self.roles.resolve(session.as_ref().map(|s| &s.user)).await
    }

    /// Guard check before showing `route`. The identity is re-read from the
    /// provider; role-restricted routes also need a single-table role.
    pub async fn check_access(&self, route: Route) -> GuardDecision {
        let user = match self.session.current() {
            Some(session) => {
                let provider = self.session.auth().provider();
                match provider.get_user(&session.access_token).await {
                    Ok(user) => user,
                    Err(e) => {
                        tracing::warn!(error = %e, "User lookup failed during guard check");
                        None
                    }
                }
            }
            None => None,
        };

        let decision = evaluate(user.as_ref(), route.access());
        if decision != GuardDecision::Admit || !needs_role_lookup(route.access()) {
            return decision;
        }
        match self.roles.resolve(user.as_ref()).await {
            Ok(resolution) => confirm_role(&resolution),
            Err(e) => {
                tracing::warn!(error = %e, "Role lookup failed during guard check");
                GuardDecision::RedirectToLogin
            }
        }
    }

    /// Enter `route` if the guard admits it. Returns the decision taken.
    pub async fn enter(&self, route: Route, navigator: &Arc<dyn Navigator>) -> GuardDecision {
        let decision = self.check_access(route).await;
        match decision {
            GuardDecision::Admit => self.session.set_route(route.path()),
            GuardDecision::RedirectToLogin => {
                navigator.navigate(Navigation::to(login_redirect(route.path())));
            }
            // Shown in place; the current route does not change
            GuardDecision::AccessDenied => {}
        }
        decision
    }

    pub fn shutdown(&self) {
        self.session.shutdown();
    }
}
