//! Document fetching with bounded retries.
//!
//! The module uses a trait-based design so the pipelines can be driven by
//! canned HTML in tests:
//! - [`FetchDocument`]: core trait, fetch the markup behind a URL
//! - [`HttpFetcher`]: `reqwest` implementation with a per-request timeout
//! - [`RetryFetch`]: decorator that retries any [`FetchDocument`] implementation
//!
//! # Retry Strategy
//!
//! - A fixed number of attempts (3 by default), first try included
//! - No delay between attempts
//! - Permanent failures (4xx, bad URL) stop immediately

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::utils::truncate_for_log;
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument, warn};

/// Trait for async document retrieval.
///
/// The returned future is `Send` so pipelines can run inside axum handlers
/// and on any tokio worker.
pub trait FetchDocument: Send + Sync {
    /// Fetch the raw markup behind `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, ScrapeError>> + Send;
}

/// Plain HTTP fetcher backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        Self::new(&config.user_agent, config.request_timeout())
    }
}

impl FetchDocument for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status,
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            preview = %truncate_for_log(&body, 120),
            "Fetched document"
        );
        Ok(body)
    }
}

/// Wrapper that retries any [`FetchDocument`] implementation a bounded
/// number of times, back to back.
pub struct RetryFetch<T> {
    /// The underlying fetcher to wrap.
    inner: T,
    /// Total attempts before giving up, first try included.
    max_attempts: usize,
}

impl<T> RetryFetch<T>
where
    T: FetchDocument,
{
    /// Create a new retry wrapper. `max_attempts` is clamped to at least one.
    pub fn new(inner: T, max_attempts: usize) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
        }
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl<T> FetchDocument for RetryFetch<T>
where
    T: FetchDocument,
{
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    let elapsed_ms_total = total_t0.elapsed().as_millis() as u64;
                    if attempt >= self.max_attempts || !e.is_transient() {
                        error!(
                            attempt,
                            max = self.max_attempts,
                            elapsed_ms_total,
                            error = %e,
                            "fetch() gave up"
                        );
                        return Err(e);
                    }
                    warn!(
                        attempt,
                        max = self.max_attempts,
                        elapsed_ms_total,
                        error = %e,
                        "fetch() attempt failed; retrying"
                    );
                }
            }
        }
    }
}

/// Build the production fetcher stack from configuration.
pub fn build_fetcher(config: &ScraperConfig) -> Result<RetryFetch<HttpFetcher>, ScrapeError> {
    Ok(RetryFetch::new(
        HttpFetcher::from_config(config)?,
        config.max_attempts,
    ))
}
