// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (route guard, security headers).

pub mod auth;
pub mod security;

pub use auth::{evaluate, require_access, AccessToken, GuardDecision, GuardState};
