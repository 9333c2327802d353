//! Database layer (external REST tables).

pub mod memory;
pub mod postgrest;

pub use memory::MemoryDb;
pub use postgrest::SupabaseDb;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CandidateProfile, ProfileUpdate, RecruiterProfile, Resume};

/// Table names as constants.
pub mod tables {
    /// Candidate profiles (keyed by `id`)
    pub const PROFILES: &str = "profiles";
    /// Recruiter profiles (keyed by `id`)
    pub const RECRUITER_PROFILES: &str = "recruiter_profiles";
    /// Resumes (keyed by `user_id`)
    pub const RESUMES: &str = "resumes";
}

/// Per-role profile tables.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_candidate_profile(&self, user_id: &str) -> Result<Option<CandidateProfile>>;

    async fn get_recruiter_profile(&self, user_id: &str) -> Result<Option<RecruiterProfile>>;

    /// Insert or fully replace a candidate profile.
    async fn upsert_candidate_profile(&self, profile: &CandidateProfile) -> Result<()>;

    /// Insert or fully replace a recruiter profile.
    async fn upsert_recruiter_profile(&self, profile: &RecruiterProfile) -> Result<()>;

    /// Apply a partial edit to an existing candidate profile.
    async fn update_candidate_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()>;

    /// Apply a partial edit to an existing recruiter profile.
    async fn update_recruiter_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<()>;

    async fn delete_candidate_profile(&self, user_id: &str) -> Result<()>;

    async fn delete_recruiter_profile(&self, user_id: &str) -> Result<()>;

    /// Every candidate row, in no particular order.
    async fn list_candidate_profiles(&self) -> Result<Vec<CandidateProfile>>;

    /// Every recruiter row, in no particular order.
    async fn list_recruiter_profiles(&self) -> Result<Vec<RecruiterProfile>>;
}

/// Resume table, one row per user.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn get_resume(&self, user_id: &str) -> Result<Option<Resume>>;

    /// Insert or fully replace the resume keyed by `resume.user_id`.
    async fn upsert_resume(&self, resume: &Resume) -> Result<()>;

    async fn delete_resume(&self, user_id: &str) -> Result<()>;
}
