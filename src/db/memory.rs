// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory tables for offline development and tests.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::db::{ProfileStore, ResumeStore};
use crate::error::{AppError, Result};
use crate::models::{CandidateProfile, ProfileUpdate, RecruiterProfile, Resume};
use crate::time_utils::format_utc_rfc3339;

/// Process-local stand-in for the REST tables.
#[derive(Default)]
pub struct MemoryDb {
    candidates: DashMap<String, CandidateProfile>,
    recruiters: DashMap<String, RecruiterProfile>,
    resumes: DashMap<String, Resume>,
    offline: AtomicBool,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail as if the backend were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn resume_count(&self) -> usize {
        self.resumes.len()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Backend(
                "Database not connected (offline mode)".to_string(),
            ));
        }
        Ok(())
    }
}

fn touch(updated_at: &mut Option<String>) {
    *updated_at = Some(format_utc_rfc3339(chrono::Utc::now()));
}

#[async_trait]
impl ProfileStore for MemoryDb {
    async fn get_candidate_profile(&self, user_id: &str) -> Result<Option<CandidateProfile>> {
        self.check_online()?;
        Ok(self.candidates.get(user_id).map(|p| p.clone()))
    }

    async fn get_recruiter_profile(&self, user_id: &str) -> Result<Option<RecruiterProfile>> {
        self.check_online()?;
        Ok(self.recruiters.get(user_id).map(|p| p.clone()))
    }

    async fn upsert_candidate_profile(&self, profile: &CandidateProfile) -> Result<()> {
        self.check_online()?;
        self.candidates.insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn upsert_recruiter_profile(&self, profile: &RecruiterProfile) -> Result<()> {
        self.check_online()?;
        self.recruiters.insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn update_candidate_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()> {
        self.check_online()?;
        // Like a filtered PATCH, a missing row is not an error.
        if let Some(mut profile) = self.candidates.get_mut(user_id) {
            profile.apply(update);
            touch(&mut profile.updated_at);
        }
        Ok(())
    }

    async fn update_recruiter_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()> {
        self.check_online()?;
        if let Some(mut profile) = self.recruiters.get_mut(user_id) {
            profile.apply(update);
            touch(&mut profile.updated_at);
        }
        Ok(())
    }

    async fn delete_candidate_profile(&self, user_id: &str) -> Result<()> {
        self.check_online()?;
        self.candidates.remove(user_id);
        Ok(())
    }

    async fn delete_recruiter_profile(&self, user_id: &str) -> Result<()> {
        self.check_online()?;
        self.recruiters.remove(user_id);
        Ok(())
    }

    async fn list_candidate_profiles(&self) -> Result<Vec<CandidateProfile>> {
        self.check_online()?;
        Ok(self.candidates.iter().map(|p| p.value().clone()).collect())
    }

    async fn list_recruiter_profiles(&self) -> Result<Vec<RecruiterProfile>> {
        self.check_online()?;
        Ok(self.recruiters.iter().map(|p| p.value().clone()).collect())
    }
}

#[async_trait]
impl ResumeStore for MemoryDb {
    async fn get_resume(&self, user_id: &str) -> Result<Option<Resume>> {
        self.check_online()?;
        Ok(self.resumes.get(user_id).map(|r| r.clone()))
    }

    async fn upsert_resume(&self, resume: &Resume) -> Result<()> {
        self.check_online()?;
        self.resumes.insert(resume.user_id.clone(), resume.clone());
        Ok(())
    }

    async fn delete_resume(&self, user_id: &str) -> Result<()> {
        self.check_online()?;
        self.resumes.remove(user_id);
        Ok(())
    }
}
