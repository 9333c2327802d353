// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Object storage for profile pictures.

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Method;

use crate::error::{AppError, Result};
use crate::services::supabase::{check_response, send, SupabaseHttp};

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Binary upload returning a public URL.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> Result<String>;
}

/// Storage path for a new avatar: `<millis>.<ext>`.
pub fn avatar_path(extension: &str, now_millis: i64) -> Result<String> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported image type: {}",
            extension
        )));
    }
    Ok(format!("{}.{}", now_millis, ext))
}

pub fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Hosted storage bucket client.
#[derive(Clone)]
pub struct SupabaseStorage {
    http: SupabaseHttp,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(http: SupabaseHttp, bucket: &str) -> Self {
        Self {
            http,
            bucket: bucket.to_string(),
        }
    }

    pub fn public_url(&self, path: &str) -> String {
        self.http
            .url(&format!("/storage/v1/object/public/{}/{}", self.bucket, path))
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        let size = bytes.len();
        let response = send(
            self.http
                .request(
                    Method::POST,
                    &format!("/storage/v1/object/{}/{}", self.bucket, path),
                )
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(bytes),
            AppError::Backend,
        )
        .await?;

        check_response(response, AppError::Backend).await?;
        tracing::info!(bucket = %self.bucket, path, size, "Uploaded object");
        Ok(self.public_url(path))
    }
}

/// Storage kept in process memory.
pub struct MemoryStorage {
    base_url: String,
    objects: DashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            objects: DashMap::new(),
        }
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.get(path).map(|o| o.clone())
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(&self, path: &str, _content_type: &str, bytes: Vec<u8>) -> Result<String> {
        if self.objects.contains_key(path) {
            return Err(AppError::Backend(format!("Object already exists: {}", path)));
        }
        self.objects.insert(path.to_string(), bytes);
        Ok(format!("{}/{}", self.base_url, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_path() {
        assert_eq!(avatar_path(".PNG", 1700).unwrap(), "1700.png");
        assert!(avatar_path("exe", 1700).is_err());
        assert_eq!(content_type_for("1700.jpeg"), "image/jpeg");
    }

    #[test]
    fn test_public_url() {
        let storage = SupabaseStorage::new(
            SupabaseHttp::new("https://p.supabase.co/", "key"),
            "avatars",
        );
        assert_eq!(
            storage.public_url("1.png"),
            "https://p.supabase.co/storage/v1/object/public/avatars/1.png"
        );
    }

    #[tokio::test]
    async fn test_memory_storage_rejects_overwrite() {
        let storage = MemoryStorage::new("http://local/avatars");
        let url = storage.upload("1.png", "image/png", vec![1, 2]).await.unwrap();
        assert_eq!(url, "http://local/avatars/1.png");
        assert!(storage.upload("1.png", "image/png", vec![3]).await.is_err());
        assert_eq!(storage.get("1.png"), Some(vec![1, 2]));
    }
}
