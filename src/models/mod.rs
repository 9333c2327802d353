// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod profile;
pub mod recommendation;
pub mod resume;
pub mod role;
pub mod user;

pub use profile::{CandidateProfile, Profile, ProfileUpdate, RecruiterProfile};
pub use recommendation::{CandidateMatch, RecommendRequest};
pub use resume::{Education, Experience, Resume, ResumeContent};
pub use role::Role;
pub use user::{AuthUser, Claims, Session, UserMetadata};

use serde::{Deserialize, Deserializer};

/// Deserialize a column that may be SQL `NULL` as the type's default.
///
/// `#[serde(default)]` alone only covers absent keys; PostgREST sends unset
/// columns as explicit `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
