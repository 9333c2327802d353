//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Name of the cookie carrying the access token.
pub const SESSION_COOKIE: &str = "career_reco_token";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend-as-a-service project URL (auth, REST, storage)
    pub supabase_url: String,
    /// API key sent with every backend request
    pub supabase_key: String,
    /// Base URL of the embedding and recommendation API
    pub api_base_url: String,
    /// Frontend URL for CORS and redirects
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Storage bucket for profile pictures
    pub avatar_bucket: String,
    /// Delay between the last keystroke and a search request
    pub search_debounce: Duration,
    /// How long an error notice stays visible
    pub notice_timeout: Duration,
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_key: "test_anon_key".to_string(),
            api_base_url: "http://localhost:8000/api".to_string(),
            frontend_url: "http://localhost:3001".to_string(),
            port: 8080,
            avatar_bucket: "avatars".to_string(),
            search_debounce: Duration::from_millis(300),
            notice_timeout: Duration::from_millis(6000),
            cookie_secure: false,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            supabase_url: env::var("SUPABASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_URL"))?,
            supabase_key: env::var("SUPABASE_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SUPABASE_KEY"))?,
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            port: parse_or("PORT", 8080)?,
            avatar_bucket: env::var("AVATAR_BUCKET").unwrap_or_else(|_| "avatars".to_string()),
            search_debounce: Duration::from_millis(parse_or("SEARCH_DEBOUNCE_MS", 300)?),
            notice_timeout: Duration::from_millis(parse_or("NOTICE_TIMEOUT_MS", 6000)?),
            cookie_secure: parse_or("COOKIE_SECURE", false)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
