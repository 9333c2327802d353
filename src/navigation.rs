// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Browser route table and the access level each view requires.

use crate::models::Role;

/// Routes that never trigger a session-expired redirect.
pub const PUBLIC_ROUTES: &[&str] = &[
    "/",
    "/about",
    "/login",
    "/signup",
    "/signup/candidate",
    "/signup/recruiter",
];

pub const LOGIN_PATH: &str = "/login";

/// Whether `path` is in the public allowlist. Query strings and trailing slashes are ignored.
pub fn is_public(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    let normalized = if trimmed.is_empty() { "/" } else { trimmed };
    PUBLIC_ROUTES.contains(&normalized)
}

/// What a visitor must have to see a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any signed-in identity.
    Authenticated,
    /// A signed-in identity whose metadata carries some role.
    AnyRole,
    /// A specific role (admin is always admitted).
    Role(Role),
}

/// Views exposed to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Login,
    Signup(Role),
    Profile,
    ProfileEdit,
    ResumeCreate,
    ResumeEdit,
    Recommend,
    CompleteProfile,
    Admin,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::About => "/about",
            Route::Login => LOGIN_PATH,
            Route::Signup(Role::Recruiter) => "/signup/recruiter",
            Route::Signup(_) => "/signup/candidate",
            Route::Profile => "/profile",
            Route::ProfileEdit => "/profile/edit",
            Route::ResumeCreate => "/resume/create",
            Route::ResumeEdit => "/resume/edit",
            Route::Recommend => "/recommend",
            Route::CompleteProfile => "/complete-profile",
            Route::Admin => "/admin",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Home | Route::About | Route::Login | Route::Signup(_) => Access::Public,
            Route::Profile | Route::ProfileEdit | Route::ResumeCreate | Route::ResumeEdit => {
                Access::Authenticated
            }
            Route::Recommend => Access::Role(Role::Recruiter),
            Route::CompleteProfile => Access::AnyRole,
            Route::Admin => Access::Role(Role::Admin),
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');
        let route = match if trimmed.is_empty() { "/" } else { trimmed } {
            "/" => Route::Home,
            "/about" => Route::About,
            "/login" => Route::Login,
            "/signup" | "/signup/candidate" => Route::Signup(Role::Candidate),
            "/signup/recruiter" => Route::Signup(Role::Recruiter),
            "/profile" => Route::Profile,
            "/profile/edit" => Route::ProfileEdit,
            "/resume/create" => Route::ResumeCreate,
            "/resume/edit" => Route::ResumeEdit,
            "/recommend" => Route::Recommend,
            "/complete-profile" => Route::CompleteProfile,
            "/admin" => Route::Admin,
            _ => return None,
        };
        Some(route)
    }
}

/// A navigation request emitted by the client core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub to: String,
    /// Ask the login view to show a "session expired" notice.
    pub session_expired: bool,
}

impl Navigation {
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            to: path.into(),
            session_expired: false,
        }
    }

    pub fn login_expired() -> Self {
        Self {
            to: LOGIN_PATH.to_string(),
            session_expired: true,
        }
    }

    /// Browser URL for this navigation, with the expiry flag as a query parameter.
    pub fn href(&self) -> String {
        if self.session_expired {
            format!("{}?expired=true", self.to)
        } else {
            self.to.clone()
        }
    }
}

/// Login URL that returns the visitor to `from` after signing in.
pub fn login_redirect(from: &str) -> String {
    format!("{}?redirect={}", LOGIN_PATH, urlencoding::encode(from))
}
