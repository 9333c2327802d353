// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resume submission pipeline.
//!
//! Handles:
//! 1. Embedding the structured content via the external service
//! 2. Encoding the vector for storage
//! 3. Upserting the full record keyed by user id
//!
//! Nothing is written unless the embedding succeeds.

use std::sync::Arc;

use crate::db::ResumeStore;
use crate::error::Result;
use crate::models::{Resume, ResumeContent};
use crate::services::embedding::EmbeddingService;
use crate::time_utils::format_utc_rfc3339;

#[derive(Clone)]
pub struct ResumeService {
    resumes: Arc<dyn ResumeStore>,
    embeddings: Arc<dyn EmbeddingService>,
}

impl ResumeService {
    pub fn new(resumes: Arc<dyn ResumeStore>, embeddings: Arc<dyn EmbeddingService>) -> Self {
        Self {
            resumes,
            embeddings,
        }
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<Resume>> {
        self.resumes.get_resume(user_id).await
    }

    /// Embed and store `content` as the user's resume, replacing any previous one.
    pub async fn submit(&self, user_id: &str, content: &ResumeContent) -> Result<Resume> {
        tracing::info!(
            user_id,
            education = content.education.len(),
            experience = content.experience.len(),
            skills = content.skills.len(),
            "Submitting resume"
        );

        let embedding = self.embeddings.embed(content).await?;

        let resume = Resume {
            user_id: user_id.to_string(),
            content: content.clone(),
            embedding: embedding.to_storage(),
            updated_at: Some(format_utc_rfc3339(chrono::Utc::now())),
        };

        self.resumes.upsert_resume(&resume).await?;
        tracing::info!(user_id, embedding_bytes = embedding.len(), "Resume saved");

        Ok(resume)
    }

    pub async fn delete(&self, user_id: &str) -> Result<()> {
        self.resumes.delete_resume(user_id).await?;
        tracing::info!(user_id, "Resume deleted");
        Ok(())
    }
}
