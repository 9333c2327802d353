//! Authenticated identity and session models.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::null_as_default;
use crate::models::role::{lenient_role, Role};

/// Identity as returned by the auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthUser {
    /// Provider user ID (UUID string)
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_metadata: UserMetadata,
}

impl AuthUser {
    /// Role recorded in identity metadata at signup, if any.
    pub fn metadata_role(&self) -> Option<Role> {
        self.user_metadata.role
    }
}

/// Free-form metadata attached to an identity at signup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserMetadata {
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Locally cached copy of the provider's session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
    /// Issued at (Unix timestamp)
    pub issued_at: i64,
    /// Expiration time (Unix timestamp)
    pub expires_at: i64,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    /// Seconds from `now` until a refresh should be attempted, given a safety margin.
    pub fn seconds_until_refresh(&self, now: i64, margin_secs: i64) -> i64 {
        (self.expires_at - margin_secs - now).max(0)
    }
}

/// Access-token claims. Only the fields the front-end reads are modeled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (provider user ID)
    pub sub: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_metadata: UserMetadata,
}

impl Claims {
    /// Read claims from an access token without verifying its signature.
    ///
    /// Only used to learn `iat`/`exp` of a token obtained directly from the
    /// provider; authorization decisions always go back to the provider.
    pub fn peek(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation).map(|d| d.claims)
    }
}
