// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public page view models.

use axum::{extract::Query, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Role;
use crate::navigation::Route;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/login", get(login_view))
}

/// Call to action on a landing page.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Link {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PageView {
    pub title: String,
    pub summary: String,
    pub links: Vec<Link>,
}

fn link(label: &str, route: Route) -> Link {
    Link {
        label: label.to_string(),
        href: route.path().to_string(),
    }
}

async fn home() -> Json<PageView> {
    Json(PageView {
        title: "Find the right talent, faster".to_string(),
        summary: "Build your resume once and let recruiters find you, or describe a role and \
                  get ranked candidates in seconds."
            .to_string(),
        links: vec![
            link("I'm a candidate", Route::Signup(Role::Candidate)),
            link("I'm a recruiter", Route::Signup(Role::Recruiter)),
            link("Log in", Route::Login),
        ],
    })
}

async fn about() -> Json<PageView> {
    Json(PageView {
        title: "About".to_string(),
        summary: "Resumes are embedded as vectors and matched against job descriptions by a \
                  separate recommendation service."
            .to_string(),
        links: vec![link("Home", Route::Home)],
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    #[serde(default)]
    expired: Option<bool>,
    #[serde(default)]
    redirect: Option<String>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginView {
    pub session_expired: bool,
    pub notice: Option<String>,
    /// Where to go after a successful login.
    pub redirect: String,
}

async fn login_view(Query(params): Query<LoginParams>) -> Json<LoginView> {
    let session_expired = params.expired.unwrap_or(false);
    // Only same-site paths are honoured as return targets.
    let redirect = params
        .redirect
        .filter(|r| r.starts_with('/') && !r.starts_with("//"))
        .unwrap_or_else(|| Route::Profile.path().to_string());

    Json(LoginView {
        session_expired,
        notice: session_expired.then(|| "Your session has expired. Please log in again.".to_string()),
        redirect,
    })
}
