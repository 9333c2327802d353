// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role lookups de-duplicated by identity.

use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::AuthUser;
use crate::services::roles::{RoleResolution, RoleResolver};

/// Resolves the role of the signed-in identity once per identity.
pub struct RoleTracker {
    resolver: RoleResolver,
    last: Mutex<Option<(String, RoleResolution)>>,
}

impl RoleTracker {
    pub fn new(resolver: RoleResolver) -> Self {
        Self {
            resolver,
            last: Mutex::new(None),
        }
    }

    /// Role for `user`. The same id reuses the previous lookup; `None` clears it.
    pub async fn resolve(&self, user: Option<&AuthUser>) -> Result<RoleResolution> {
        let mut last = self.last.lock().await;

        let Some(user) = user else {
            *last = None;
            return Ok(RoleResolution::Unresolved);
        };

        if let Some((id, resolution)) = last.as_ref() {
            if *id == user.id {
                return Ok(*resolution);
            }
        }

        let resolution = self.resolver.resolve(&user.id).await?;
        tracing::debug!(user_id = %user.id, ?resolution, "Resolved role");
        *last = Some((user.id.clone(), resolution));
        Ok(resolution)
    }
}
