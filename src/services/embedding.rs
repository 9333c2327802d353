// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Embedding service client.
//!
//! The service turns structured resume content into a binary vector and
//! returns it base64-encoded. We decode it to validate, then re-encode for
//! storage next to the resume row.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::ResumeContent;

/// Binary embedding vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embedding(Vec<u8>);

impl Embedding {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        BASE64
            .decode(encoded.trim())
            .map(Self)
            .map_err(|e| AppError::Embedding(format!("Invalid base64 embedding: {}", e)))
    }

    /// Encoding used for the `embedding` column.
    pub fn to_storage(&self) -> String {
        BASE64.encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Produces embeddings for resume content.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, content: &ResumeContent) -> Result<Embedding>;
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: String,
}

/// HTTP client for `POST <base>/generate-embedding/`.
#[derive(Clone)]
pub struct EmbeddingClient {
    http: reqwest::Client,
    base_url: String,
}

impl EmbeddingClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl EmbeddingService for EmbeddingClient {
    async fn embed(&self, content: &ResumeContent) -> Result<Embedding> {
        let url = format!("{}/generate-embedding/", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "resume_data": content }))
            .send()
            .await
            .map_err(|e| AppError::Embedding(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Embedding(format!("HTTP {}: {}", status, body)));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("JSON parse error: {}", e)))?;

        let embedding = Embedding::from_base64(&body.embedding)?;
        if embedding.is_empty() {
            return Err(AppError::Embedding("Empty embedding".to_string()));
        }

        tracing::debug!(bytes = embedding.len(), "Received embedding");
        Ok(embedding)
    }
}
