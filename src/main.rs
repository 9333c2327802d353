// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Career-Reco API Server
//!
//! Serves the recruiting front-end's pages and actions, delegating identity,
//! storage and matching to the hosted backend and the recommendation API.

use career_reco::{
    config::Config,
    db::SupabaseDb,
    services::{EmbeddingClient, RecommenderClient, SupabaseAuth, SupabaseHttp, SupabaseStorage},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Career-Reco API");

    let http = SupabaseHttp::new(&config.supabase_url, &config.supabase_key);
    tracing::info!(url = %http.base_url(), "Backend client initialized");

    let auth = Arc::new(SupabaseAuth::new(http.clone()));
    let db = Arc::new(SupabaseDb::new(http.clone()));
    let storage = Arc::new(SupabaseStorage::new(http, &config.avatar_bucket));

    let embeddings = Arc::new(EmbeddingClient::new(&config.api_base_url));
    let matcher = Arc::new(RecommenderClient::new(&config.api_base_url));
    tracing::info!(api = %config.api_base_url, "Recommendation API client initialized");

    // Build shared state
    let state = Arc::new(AppState::new(
        config.clone(),
        auth,
        db.clone(),
        db,
        storage,
        embeddings,
        matcher,
    ));

    // Build router
    let app = career_reco::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["career_reco=debug", "info"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
