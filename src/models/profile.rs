// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-role profile records.
//!
//! Rows come from an external table whose shape is not under our control, so
//! every field except the key defaults when missing.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::null_as_default;
use crate::models::role::{lenient_role, Role};

/// Candidate profile, stored in the `profiles` table keyed by `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CandidateProfile {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl CandidateProfile {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }

    pub fn apply(&mut self, update: &ProfileUpdate) {
        set_if(&mut self.first_name, &update.first_name);
        set_if(&mut self.last_name, &update.last_name);
        set_opt(&mut self.phone, &update.phone);
        set_opt(&mut self.location, &update.location);
        set_opt(&mut self.bio, &update.bio);
        set_opt(&mut self.linkedin, &update.linkedin);
        set_opt(&mut self.github, &update.github);
        set_opt(&mut self.website, &update.website);
        set_opt(&mut self.profile_picture, &update.profile_picture);
    }
}

/// Recruiter profile, stored in the `recruiter_profiles` table keyed by `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecruiterProfile {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl RecruiterProfile {
    /// Full name, or `"Recruiter"` for rows created before names were collected.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        match name.trim() {
            "" => "Recruiter".to_string(),
            name => name.to_string(),
        }
    }

    pub fn apply(&mut self, update: &ProfileUpdate) {
        set_if(&mut self.company, &update.company);
        set_opt(&mut self.position, &update.position);
        set_opt(&mut self.phone, &update.phone);
        set_opt(&mut self.bio, &update.bio);
        set_opt(&mut self.linkedin, &update.linkedin);
        set_opt(&mut self.website, &update.website);
        set_opt(&mut self.profile_picture, &update.profile_picture);
    }
}

/// Partial profile edit. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, validator::Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileUpdate {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 200))]
    pub company: Option<String>,
    pub position: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    pub location: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    #[validate(url)]
    pub linkedin: Option<String>,
    #[validate(url)]
    pub github: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(url)]
    pub profile_picture: Option<String>,
}

fn set_if(target: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *target = v.clone();
    }
}

fn set_opt(target: &mut Option<String>, value: &Option<String>) {
    if value.is_some() {
        *target = value.clone();
    }
}

/// A profile of either kind, as rendered by the profile page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Profile {
    Candidate(CandidateProfile),
    Recruiter(RecruiterProfile),
}
