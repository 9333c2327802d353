// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - clients for the external collaborators and the flows built on them.

pub mod auth;
pub mod embedding;
pub mod memory_auth;
pub mod recommender;
pub mod resumes;
pub mod roles;
pub mod storage;
pub mod supabase;

pub use auth::{AuthEvent, AuthEventKind, AuthProvider, Credentials, SignUpOutcome, SupabaseAuth};
pub use embedding::{Embedding, EmbeddingClient, EmbeddingService};
pub use memory_auth::MemoryAuth;
pub use recommender::{MatchingService, RecommenderClient};
pub use resumes::ResumeService;
pub use roles::{RoleResolution, RoleResolver};
pub use storage::{MemoryStorage, ObjectStorage, SupabaseStorage};
pub use supabase::SupabaseHttp;
