//! Statistics-page scrapers.
//!
//! Each dataset has its own module and follows the same two-phase pattern:
//!
//! 1. **Fetching**: download the page through a [`FetchDocument`] implementation
//! 2. **Extraction**: a pure, synchronous pass over the parsed markup
//!
//! | Dataset | Module | Table located by |
//! |---------|--------|------------------|
//! | Standings | [`standings`] | row count, then yield of validated rows |
//! | Corners | [`corners`] | `th` text containing home/away keywords |
//! | Goals | [`goals`] | `id="btable"` |
//!
//! Extractors never fail: a structural miss is an empty dataset and a bad
//! cell is a zero. Only the fetch phase returns errors.
//!
//! Diagnostics are scoped by a [`ScrapeContext`] passed into every pipeline,
//! so concurrent requests log under their own span.
//!
//! [`FetchDocument`]: crate::fetch::FetchDocument

pub mod corners;
pub mod goals;
pub mod standings;
pub mod tables;

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Span, info_span};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Per-request diagnostics scope.
#[derive(Debug, Clone)]
pub struct ScrapeContext {
    pub request_id: u64,
    pub league: String,
    span: Span,
}

impl ScrapeContext {
    pub fn new(league: &str) -> Self {
        let request_id = NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        let span = info_span!("scrape", request_id, league = %league);
        Self {
            request_id,
            league: league.to_string(),
            span,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Child span for one fetch+extract pipeline.
    pub fn pipeline_span(&self, pipeline: &'static str) -> Span {
        info_span!(parent: &self.span, "pipeline", pipeline, request_id = self.request_id)
    }
}
