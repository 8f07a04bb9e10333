//! Runtime configuration.
//!
//! Every field has a default, so the service runs with no config file at all.
//! A YAML file passed with `--config` overrides any subset of fields:
//!
//! ```yaml
//! bind: "127.0.0.1:8080"
//! max_attempts: 5
//! form_seed: 42
//! ```
//!
//! The three URL templates carry a `{league}` placeholder and point at the
//! standings, corners and goals pages of the statistics site.

use crate::error::ScrapeError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

pub const LEAGUE_PLACEHOLDER: &str = "{league}";

pub const DEFAULT_STANDINGS_URL: &str = "https://www.soccerstats.com/latest.asp?league={league}";
pub const DEFAULT_CORNERS_URL: &str =
    "https://www.soccerstats.com/table.asp?league={league}&tid=cr";
pub const DEFAULT_GOALS_URL: &str = "https://www.soccerstats.com/table.asp?league={league}&tid=c";

/// Service configuration, deserialized from YAML.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ScraperConfig {
    /// Address the HTTP server listens on.
    pub bind: String,
    /// Standings page template.
    pub standings_url: String,
    /// Corner statistics page template.
    pub corners_url: String,
    /// Goal-threshold statistics page template.
    pub goals_url: String,
    /// Timeout applied to every single HTTP request.
    pub request_timeout_secs: u64,
    /// Deadline for one whole fetch+extract pipeline, retries included.
    /// Unset means room for every attempt to run its full request timeout.
    pub pipeline_timeout_secs: Option<u64>,
    /// Total attempts per document (first try included).
    pub max_attempts: usize,
    pub user_agent: String,
    /// Attribution returned alongside every team record.
    pub source_name: String,
    /// How many team names a not-found response lists.
    pub available_teams_hint: usize,
    /// Seed for the synthesized recent-form sequence. Unset means OS entropy.
    pub form_seed: Option<u64>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
            standings_url: DEFAULT_STANDINGS_URL.to_string(),
            corners_url: DEFAULT_CORNERS_URL.to_string(),
            goals_url: DEFAULT_GOALS_URL.to_string(),
            request_timeout_secs: 10,
            pipeline_timeout_secs: None,
            max_attempts: 3,
            user_agent: concat!("Mozilla/5.0 (compatible; soccer_stats_scraper/", env!("CARGO_PKG_VERSION"), ")").to_string(),
            source_name: "SoccerStats.com".to_string(),
            available_teams_hint: 10,
            form_seed: None,
        }
    }
}

impl ScraperConfig {
    /// Load a config file, or the defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, ScrapeError> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Self::default());
        };
        let raw = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml(&raw)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ScrapeError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn pipeline_timeout(&self) -> Duration {
        match self.pipeline_timeout_secs {
            Some(secs) => Duration::from_secs(secs),
            None => self.request_timeout() * self.max_attempts.max(1) as u32,
        }
    }

    /// The three source URLs for one league.
    pub fn source_urls(&self, league: &str) -> Result<SourceUrls, ScrapeError> {
        Ok(SourceUrls {
            standings: league_url(&self.standings_url, league)?,
            corners: league_url(&self.corners_url, league)?,
            goals: league_url(&self.goals_url, league)?,
        })
    }
}

/// Fully substituted page URLs for a single league.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrls {
    pub standings: String,
    pub corners: String,
    pub goals: String,
}

/// Substitute a percent-encoded league code into a URL template.
pub fn league_url(template: &str, league: &str) -> Result<String, ScrapeError> {
    let encoded = urlencoding::encode(league.trim());
    let url = Url::parse(&template.replace(LEAGUE_PLACEHOLDER, &encoded))?;
    Ok(url.to_string())
}
