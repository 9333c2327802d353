// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Current identity and its resolved role.

use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{AuthUser, Role};
use crate::services::RoleResolution;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/me", get(me))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: AuthUser,
    pub resolution: RoleResolution,
    /// Role usable for gating, if any.
    pub role: Option<Role>,
}

async fn me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let resolution = state.roles.resolve(&user.id).await?;
    Ok(Json(MeResponse {
        role: resolution.role(),
        resolution,
        user,
    }))
}
