// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recommender view: debounced job-description search with ranked results.
//!
//! Every issued search is stamped with a generation number. Under
//! [`OrderingPolicy::LatestIssued`] a response only reaches the visible
//! state if no newer search has been issued since, so a slow early request
//! can never overwrite a faster later one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::config::Config;
use crate::models::recommendation::{rank, DEFAULT_TOP_N};
use crate::models::{CandidateMatch, RecommendRequest};
use crate::services::recommender::MatchingService;

/// Which response wins when searches overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Only the most recently issued search may update the results.
    #[default]
    LatestIssued,
    /// Whatever finishes last is shown, even if it answers an older query.
    LastCompleted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommenderState {
    pub job_description: String,
    pub top_n: u32,
    pub results: Vec<CandidateMatch>,
    /// At least one search is outstanding.
    pub loading: bool,
    pub notice: Option<String>,
    /// Generation of the search whose results are showing (0 = none).
    pub shown_generation: u64,
    in_flight: usize,
}

impl Default for RecommenderState {
    fn default() -> Self {
        Self {
            job_description: String::new(),
            top_n: DEFAULT_TOP_N,
            results: Vec::new(),
            loading: false,
            notice: None,
            shown_generation: 0,
            in_flight: 0,
        }
    }
}

pub struct RecommenderView {
    matcher: Arc<dyn MatchingService>,
    policy: OrderingPolicy,
    debounce: Duration,
    notice_timeout: Duration,
    /// Latest generation handed out
    issued: AtomicU64,
    /// Bumped on every input change; a debounced search fires only if still current
    input_version: AtomicU64,
    notice_version: AtomicU64,
    state: watch::Sender<RecommenderState>,
}

impl RecommenderView {
    pub fn new(matcher: Arc<dyn MatchingService>, config: &Config) -> Arc<Self> {
        Self::with_policy(matcher, config, OrderingPolicy::default())
    }

    pub fn with_policy(
        matcher: Arc<dyn MatchingService>,
        config: &Config,
        policy: OrderingPolicy,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(RecommenderState::default());
        Arc::new(Self {
            matcher,
            policy,
            debounce: config.search_debounce,
            notice_timeout: config.notice_timeout,
            issued: AtomicU64::new(0),
            input_version: AtomicU64::new(0),
            notice_version: AtomicU64::new(0),
            state,
        })
    }

    pub fn state(&self) -> RecommenderState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RecommenderState> {
        self.state.subscribe()
    }

    /// Update the query text. Non-empty text schedules a debounced search.
    pub fn set_job_description(self: &Arc<Self>, text: &str) {
        self.state
            .send_modify(|s| s.job_description = text.to_string());
        self.input_changed();
    }

    /// Update the result bound. The [1, 20] range is a hint for the input widget only.
    pub fn set_top_n(self: &Arc<Self>, top_n: u32) {
        self.state.send_modify(|s| s.top_n = top_n);
        self.input_changed();
    }

    pub fn dismiss_notice(&self) {
        self.notice_version.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|s| s.notice = None);
    }

    fn input_changed(self: &Arc<Self>) {
        let version = self.input_version.fetch_add(1, Ordering::SeqCst) + 1;

        if self.state.borrow().job_description.trim().is_empty() {
            self.clear();
            return;
        }

        let view = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(view.debounce).await;
            if view.input_version.load(Ordering::SeqCst) == version {
                view.search().await;
            }
        });
    }

    /// Empty query: drop results without asking the service.
    fn clear(&self) {
        // Invalidates anything still outstanding under LatestIssued.
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.results.clear();
            s.shown_generation = generation;
        });
    }

    /// Issue a search for the current input now, bypassing the debounce.
    pub async fn search(self: &Arc<Self>) {
        let (job_description, top_n) = {
            let state = self.state.borrow();
            (state.job_description.trim().to_string(), state.top_n)
        };
        if job_description.is_empty() {
            self.clear();
            return;
        }

        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.in_flight += 1;
            s.loading = true;
        });
        tracing::debug!(generation, top_n, "Issuing recommendation search");

        let request = RecommendRequest::new(job_description, top_n);
        let result = self.matcher.recommend(&request).await;

        let current = self.policy == OrderingPolicy::LastCompleted
            || self.issued.load(Ordering::SeqCst) == generation;

        let mut failed = false;
        self.state.send_modify(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            s.loading = s.in_flight > 0;

            if !current {
                tracing::debug!(generation, "Discarding stale recommendation response");
                return;
            }

            match result {
                Ok(matches) => {
                    s.results = rank(matches, top_n);
                    s.shown_generation = generation;
                    s.notice = None;
                }
                Err(e) => {
                    tracing::warn!(generation, error = %e, "Recommendation search failed");
                    s.notice = Some(e.user_message());
                    failed = true;
                }
            }
        });

        if failed {
            self.schedule_notice_dismissal();
        }
    }

    fn schedule_notice_dismissal(self: &Arc<Self>) {
        let version = self.notice_version.fetch_add(1, Ordering::SeqCst) + 1;
        let view = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(view.notice_timeout).await;
            if view.notice_version.load(Ordering::SeqCst) == version {
                view.state.send_modify(|s| s.notice = None);
            }
        });
    }
}
