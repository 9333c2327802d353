// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared HTTP plumbing for the backend-as-a-service REST endpoints.

use crate::error::AppError;
use serde::de::DeserializeOwned;

/// Thin wrapper that stamps project credentials on every request.
#[derive(Clone)]
pub struct SupabaseHttp {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseHttp {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request authorized with the project key.
    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.request_as(method, path, &self.api_key)
    }

    /// Start a request authorized with a user's access token.
    pub fn request_as(
        &self,
        method: reqwest::Method,
        path: &str,
        bearer: &str,
    ) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }
}

/// Send a request, mapping transport failures with `wrap`.
pub async fn send(
    request: reqwest::RequestBuilder,
    wrap: fn(String) -> AppError,
) -> Result<reqwest::Response, AppError> {
    request.send().await.map_err(|e| wrap(e.to_string()))
}

/// Check response status and return error if not successful.
pub async fn check_response(
    response: reqwest::Response,
    wrap: fn(String) -> AppError,
) -> Result<reqwest::Response, AppError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or(body);

    if status.as_u16() == 401 {
        return Err(AppError::InvalidToken);
    }

    Err(wrap(format!("HTTP {}: {}", status, message)))
}

/// Check response and parse JSON body.
pub async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
    wrap: fn(String) -> AppError,
) -> Result<T, AppError> {
    check_response(response, wrap)
        .await?
        .json()
        .await
        .map_err(|e| wrap(format!("JSON parse error: {}", e)))
}

/// Pull a human-readable message out of a JSON error body, if there is one.
///
/// GoTrue, PostgREST and Storage each use a different key.
pub fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}
