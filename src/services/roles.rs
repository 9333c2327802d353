// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role resolution by probing the two profile tables.
//!
//! Precedence, highest first:
//! 1. Row in both tables: `Conflict`. Flagged, grants no role.
//! 2. Row in the candidate table: its `role` column (default `candidate`).
//! 3. Row in the recruiter table: its `role` column (default `recruiter`).
//! 4. Neither: `Unresolved`.

use serde::Serialize;
use std::sync::Arc;

use crate::db::ProfileStore;
use crate::error::Result;
use crate::models::Role;

/// Outcome of probing the profile tables for one user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "role", rename_all = "snake_case")]
pub enum RoleResolution {
    Candidate(Role),
    Recruiter(Role),
    Unresolved,
    Conflict { candidate: Role, recruiter: Role },
}

impl RoleResolution {
    /// Role usable for gating. Conflicts and unresolved ids grant none.
    pub fn role(&self) -> Option<Role> {
        match self {
            RoleResolution::Candidate(role) | RoleResolution::Recruiter(role) => Some(*role),
            RoleResolution::Unresolved | RoleResolution::Conflict { .. } => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, RoleResolution::Conflict { .. })
    }
}

/// Resolves a user's role from the profile tables.
#[derive(Clone)]
pub struct RoleResolver {
    profiles: Arc<dyn ProfileStore>,
}

impl RoleResolver {
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles }
    }

    pub async fn resolve(&self, user_id: &str) -> Result<RoleResolution> {
        // Both tables are read so a dual entry is seen rather than shadowed.
        let (candidate, recruiter) = futures_util::future::join(
            self.profiles.get_candidate_profile(user_id),
            self.profiles.get_recruiter_profile(user_id),
        )
        .await;

        let candidate_role = candidate?.map(|p| p.role.unwrap_or(Role::Candidate));
        let recruiter_role = recruiter?.map(|p| p.role.unwrap_or(Role::Recruiter));

        let resolution = match (candidate_role, recruiter_role) {
            (Some(candidate), Some(recruiter)) => {
                tracing::warn!(
                    user_id,
                    candidate = %candidate,
                    recruiter = %recruiter,
                    "User id present in both profile tables"
                );
                RoleResolution::Conflict {
                    candidate,
                    recruiter,
                }
            }
            (Some(role), None) => RoleResolution::Candidate(role),
            (None, Some(role)) => RoleResolution::Recruiter(role),
            (None, None) => RoleResolution::Unresolved,
        };

        tracing::debug!(user_id, resolution = ?resolution, "Resolved role");
        Ok(resolution)
    }
}
