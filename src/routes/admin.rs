// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin dashboard: every profile across both tables.
//!
//! Rows are addressed by `(source, id)` where `source` names the table the row
//! lives in. Edits never move a row between tables.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use validator::Validate;

use crate::db::tables;
use crate::error::{AppError, Result};
use crate::models::{CandidateProfile, Profile, RecruiterProfile, Role};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/profiles", get(list_profiles).post(create_profile))
        .route(
            "/admin/profiles/{source}/{id}",
            put(update_profile).delete(delete_profile),
        )
}

/// The table a listed row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    Profiles,
    RecruiterProfiles,
}

impl ProfileSource {
    pub fn table(self) -> &'static str {
        match self {
            ProfileSource::Profiles => tables::PROFILES,
            ProfileSource::RecruiterProfiles => tables::RECRUITER_PROFILES,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminProfileRow {
    pub id: String,
    pub source: ProfileSource,
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
    pub profile_picture: Option<String>,
    pub created_at: Option<String>,
}

impl From<CandidateProfile> for AdminProfileRow {
    fn from(p: CandidateProfile) -> Self {
        Self {
            name: p.display_name(),
            id: p.id,
            source: ProfileSource::Profiles,
            email: p.email,
            role: p.role,
            profile_picture: p.profile_picture,
            created_at: p.created_at,
        }
    }
}

impl From<RecruiterProfile> for AdminProfileRow {
    fn from(p: RecruiterProfile) -> Self {
        Self {
            name: p.display_name(),
            id: p.id,
            source: ProfileSource::RecruiterProfiles,
            email: p.email,
            // Rows in this table are recruiters whatever the column says.
            role: Some(Role::Recruiter),
            profile_picture: p.profile_picture,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminProfileList {
    pub profiles: Vec<AdminProfileRow>,
    /// Rows per role name; rows without a role count as `"unknown"`.
    pub role_counts: BTreeMap<String, usize>,
}

/// Merge both tables, newest first.
pub fn merge_profiles(
    candidates: Vec<CandidateProfile>,
    recruiters: Vec<RecruiterProfile>,
) -> AdminProfileList {
    let mut profiles: Vec<AdminProfileRow> = candidates
        .into_iter()
        .map(AdminProfileRow::from)
        .chain(recruiters.into_iter().map(AdminProfileRow::from))
        .collect();
    // RFC 3339 timestamps in UTC sort lexically; rows without one go last.
    profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut role_counts = BTreeMap::new();
    for row in &profiles {
        let role = row
            .role
            .map(|r| r.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        *role_counts.entry(role).or_insert(0) += 1;
    }

    AdminProfileList {
        profiles,
        role_counts,
    }
}

async fn list_profiles(State(state): State<Arc<AppState>>) -> Result<Json<AdminProfileList>> {
    let (candidates, recruiters) = tokio::try_join!(
        state.profiles.list_candidate_profiles(),
        state.profiles.list_recruiter_profiles(),
    )?;
    Ok(Json(merge_profiles(candidates, recruiters)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdminProfileRequest {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(url)]
    pub profile_picture: Option<String>,
    /// Only read on create; picks the table.
    #[serde(default)]
    pub role: Option<Role>,
}

async fn create_profile(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AdminProfileRequest>,
) -> Result<(StatusCode, Json<Profile>)> {
    body.validate()?;
    let role = body.role.unwrap_or(Role::Candidate);
    let id = uuid::Uuid::new_v4().to_string();
    let now = Some(format_utc_rfc3339(chrono::Utc::now()));

    let profile = match role {
        Role::Recruiter => {
            let row = RecruiterProfile {
                id,
                email: body.email.unwrap_or_default(),
                role: Some(Role::Recruiter),
                first_name: body.first_name.unwrap_or_default(),
                last_name: body.last_name.unwrap_or_default(),
                profile_picture: body.profile_picture,
                created_at: now.clone(),
                updated_at: now,
                ..Default::default()
            };
            state.profiles.upsert_recruiter_profile(&row).await?;
            Profile::Recruiter(row)
        }
        _ => {
            let row = CandidateProfile {
                id,
                email: body.email.unwrap_or_default(),
                role: Some(role),
                first_name: body.first_name.unwrap_or_default(),
                last_name: body.last_name.unwrap_or_default(),
                profile_picture: body.profile_picture,
                created_at: now.clone(),
                updated_at: now,
                ..Default::default()
            };
            state.profiles.upsert_candidate_profile(&row).await?;
            Profile::Candidate(row)
        }
    };

    tracing::info!(role = %role, "Admin created profile");
    Ok((StatusCode::CREATED, Json(profile)))
}

fn set_if(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path((source, id)): Path<(ProfileSource, String)>,
    Json(body): Json<AdminProfileRequest>,
) -> Result<Json<Profile>> {
    body.validate()?;
    let not_found = || AppError::NotFound("Profile not found".to_string());
    let now = Some(format_utc_rfc3339(chrono::Utc::now()));

    let profile = match source {
        ProfileSource::Profiles => {
            let mut row = state
                .profiles
                .get_candidate_profile(&id)
                .await?
                .ok_or_else(not_found)?;
            set_if(&mut row.first_name, &body.first_name);
            set_if(&mut row.last_name, &body.last_name);
            set_if(&mut row.email, &body.email);
            row.profile_picture = body.profile_picture.clone().or(row.profile_picture);
            row.updated_at = now;
            state.profiles.upsert_candidate_profile(&row).await?;
            Profile::Candidate(row)
        }
        ProfileSource::RecruiterProfiles => {
            let mut row = state
                .profiles
                .get_recruiter_profile(&id)
                .await?
                .ok_or_else(not_found)?;
            set_if(&mut row.first_name, &body.first_name);
            set_if(&mut row.last_name, &body.last_name);
            set_if(&mut row.email, &body.email);
            row.profile_picture = body.profile_picture.clone().or(row.profile_picture);
            row.updated_at = now;
            state.profiles.upsert_recruiter_profile(&row).await?;
            Profile::Recruiter(row)
        }
    };

    tracing::info!(table = source.table(), id = %id, "Admin updated profile");
    Ok(Json(profile))
}

async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Path((source, id)): Path<(ProfileSource, String)>,
) -> Result<StatusCode> {
    match source {
        ProfileSource::Profiles => state.profiles.delete_candidate_profile(&id).await?,
        ProfileSource::RecruiterProfiles => state.profiles.delete_recruiter_profile(&id).await?,
    }
    tracing::info!(table = source.table(), id = %id, "Admin deleted profile");
    Ok(StatusCode::NO_CONTENT)
}
