// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PostgREST client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Candidate profiles
//! - Recruiter profiles
//! - Resumes (upsert keyed by user id)

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::{tables, ProfileStore, ResumeStore};
use crate::error::{AppError, Result};
use crate::models::{CandidateProfile, ProfileUpdate, RecruiterProfile, Resume};
use crate::services::supabase::{check_response, check_response_json, send, SupabaseHttp};
use crate::time_utils::format_utc_rfc3339;

/// Columns a candidate may edit.
const CANDIDATE_EDITABLE: &[&str] = &[
    "first_name",
    "last_name",
    "phone",
    "location",
    "bio",
    "linkedin",
    "github",
    "website",
    "profile_picture",
];

/// Columns a recruiter may edit.
const RECRUITER_EDITABLE: &[&str] = &[
    "company",
    "position",
    "phone",
    "bio",
    "linkedin",
    "website",
    "profile_picture",
];

/// REST table client.
#[derive(Clone)]
pub struct SupabaseDb {
    http: SupabaseHttp,
}

impl SupabaseDb {
    pub fn new(http: SupabaseHttp) -> Self {
        Self { http }
    }

    fn table_path(table: &str) -> String {
        format!("/rest/v1/{}", table)
    }

    async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        key: &str,
        value: &str,
    ) -> Result<Option<T>> {
        let filter = format!("eq.{}", value);
        let response = send(
            self.http
                .request(Method::GET, &Self::table_path(table))
                .query(&[("select", "*"), (key, filter.as_str()), ("limit", "1")]),
            AppError::Backend,
        )
        .await?;

        let mut rows: Vec<T> = check_response_json(response, AppError::Backend).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn select_all<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let response = send(
            self.http
                .request(Method::GET, &Self::table_path(table))
                .query(&[("select", "*")]),
            AppError::Backend,
        )
        .await?;

        check_response_json(response, AppError::Backend).await
    }

    async fn upsert<T: Serialize + Sync>(&self, table: &str, key: &str, row: &T) -> Result<()> {
        let response = send(
            self.http
                .request(Method::POST, &Self::table_path(table))
                .query(&[("on_conflict", key)])
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(row),
            AppError::Backend,
        )
        .await?;

        check_response(response, AppError::Backend).await?;
        Ok(())
    }

    async fn patch(
        &self,
        table: &str,
        key: &str,
        value: &str,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> Result<()> {
        let filter = format!("eq.{}", value);
        let response = send(
            self.http
                .request(Method::PATCH, &Self::table_path(table))
                .query(&[(key, filter.as_str())])
                .header("Prefer", "return=minimal")
                .json(&fields),
            AppError::Backend,
        )
        .await?;

        check_response(response, AppError::Backend).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, key: &str, value: &str) -> Result<()> {
        let filter = format!("eq.{}", value);
        let response = send(
            self.http
                .request(Method::DELETE, &Self::table_path(table))
                .query(&[(key, filter.as_str())]),
            AppError::Backend,
        )
        .await?;

        check_response(response, AppError::Backend).await?;
        Ok(())
    }
}

/// Keep only the present, editable fields of an update, and stamp `updated_at`.
fn patch_fields(
    update: &ProfileUpdate,
    editable: &[&str],
) -> Result<serde_json::Map<String, serde_json::Value>> {
    let value = serde_json::to_value(update).map_err(|e| AppError::Internal(e.into()))?;
    let mut fields: serde_json::Map<_, _> = value
        .as_object()
        .into_iter()
        .flatten()
        .filter(|(k, v)| !v.is_null() && editable.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    fields.insert(
        "updated_at".to_string(),
        serde_json::Value::String(format_utc_rfc3339(chrono::Utc::now())),
    );
    Ok(fields)
}

#[async_trait]
impl ProfileStore for SupabaseDb {
    async fn get_candidate_profile(&self, user_id: &str) -> Result<Option<CandidateProfile>> {
        self.select_one(tables::PROFILES, "id", user_id).await
    }

    async fn get_recruiter_profile(&self, user_id: &str) -> Result<Option<RecruiterProfile>> {
        self.select_one(tables::RECRUITER_PROFILES, "id", user_id)
            .await
    }

    async fn upsert_candidate_profile(&self, profile: &CandidateProfile) -> Result<()> {
        self.upsert(tables::PROFILES, "id", profile).await
    }

    async fn upsert_recruiter_profile(&self, profile: &RecruiterProfile) -> Result<()> {
        self.upsert(tables::RECRUITER_PROFILES, "id", profile).await
    }

    async fn update_candidate_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()> {
        let fields = patch_fields(update, CANDIDATE_EDITABLE)?;
        self.patch(tables::PROFILES, "id", user_id, fields).await
    }

    async fn update_recruiter_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()> {
        let fields = patch_fields(update, RECRUITER_EDITABLE)?;
        self.patch(tables::RECRUITER_PROFILES, "id", user_id, fields)
            .await
    }

    async fn delete_candidate_profile(&self, user_id: &str) -> Result<()> {
        self.delete(tables::PROFILES, "id", user_id).await
    }

    async fn delete_recruiter_profile(&self, user_id: &str) -> Result<()> {
        self.delete(tables::RECRUITER_PROFILES, "id", user_id).await
    }

    async fn list_candidate_profiles(&self) -> Result<Vec<CandidateProfile>> {
        self.select_all(tables::PROFILES).await
    }

    async fn list_recruiter_profiles(&self) -> Result<Vec<RecruiterProfile>> {
        self.select_all(tables::RECRUITER_PROFILES).await
    }
}

#[async_trait]
impl ResumeStore for SupabaseDb {
    async fn get_resume(&self, user_id: &str) -> Result<Option<Resume>> {
        self.select_one(tables::RESUMES, "user_id", user_id).await
    }

    async fn upsert_resume(&self, resume: &Resume) -> Result<()> {
        // Every column is sent, so merge-on-conflict replaces the whole row.
        self.upsert(tables::RESUMES, "user_id", resume).await
    }

    async fn delete_resume(&self, user_id: &str) -> Result<()> {
        self.delete(tables::RESUMES, "user_id", user_id).await
    }
}
