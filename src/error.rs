//! Error type shared by the fetch layer, configuration and the request service.
//!
//! Extractors never return errors: a missing table or an unparseable cell
//! degrades to an empty dataset or a zero value. Only fetching, timeouts and
//! configuration loading can fail.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures that can escape a scraping pipeline.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Transport-level failure (connect, TLS, body read, client timeout).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The statistics site answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    HttpStatus { status: StatusCode, url: String },

    /// A whole pipeline (all attempts included) ran past its deadline.
    #[error("{pipeline} pipeline timed out after {secs}s")]
    Timeout { pipeline: &'static str, secs: u64 },

    /// A source URL built from a template did not parse.
    #[error("invalid source url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    /// Whether a retry of the same request could plausibly succeed.
    ///
    /// Client errors (4xx) and malformed URLs are permanent; everything
    /// network-shaped is worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            ScrapeError::Http(_) | ScrapeError::Timeout { .. } => true,
            ScrapeError::HttpStatus { status, .. } => !status.is_client_error(),
            ScrapeError::InvalidUrl(_) | ScrapeError::Config(_) | ScrapeError::Io(_) => false,
        }
    }
}
