//! Request orchestration.
//!
//! A team request runs the standings, corners and goals pipelines
//! concurrently, each under its own deadline, and assembles once all three
//! have settled. Failure policy:
//!
//! - standings failing (fetch exhausted or timed out) fails the request,
//!   since without standings no team can be resolved;
//! - corners or goals failing degrades to an empty dataset with a warning.
//!
//! Nothing is cached or shared between requests.

use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::fetch::FetchDocument;
use crate::matcher;
use crate::models::TeamDataset;
use crate::report::{self, Datasets, TeamReport};
use crate::scrapers::{ScrapeContext, corners, goals, standings};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{Instrument, info, warn};

/// Outcome of a team lookup that did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum TeamLookup {
    Found(TeamReport),
    /// The name matched nothing; carries a few valid names as a hint.
    NotFound { available: Vec<String> },
}

/// One line of the league overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntry {
    pub name: String,
    pub position: u32,
    pub points: u32,
    pub matches_played: u32,
}

/// Scraping service over any document fetcher.
#[derive(Debug)]
pub struct ScrapeService<F> {
    fetcher: F,
    config: ScraperConfig,
}

impl<F: FetchDocument> ScrapeService<F> {
    pub fn new(fetcher: F, config: ScraperConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Scrape all three datasets for `league` and build the record for `team`.
    pub async fn team(&self, league: &str, team: &str) -> Result<TeamLookup, ScrapeError> {
        let ctx = ScrapeContext::new(league);
        let span = ctx.span().clone();
        self.team_in(&ctx, team).instrument(span).await
    }

    async fn team_in(&self, ctx: &ScrapeContext, team: &str) -> Result<TeamLookup, ScrapeError> {
        info!(%team, "Team scrape requested");
        let urls = self.config.source_urls(&ctx.league)?;
        let limit = self.config.pipeline_timeout();

        let (standings, corners, goals) = tokio::join!(
            bounded("standings", limit, standings::scrape(&self.fetcher, &urls.standings, ctx)),
            bounded("corners", limit, corners::scrape(&self.fetcher, &urls.corners, ctx)),
            bounded("goals", limit, goals::scrape(&self.fetcher, &urls.goals, ctx)),
        );
        let standings = standings?;
        let corners = or_empty("corners", corners);
        let goals = or_empty("goals", goals);

        let Some(resolved) = matcher::resolve(team, &standings) else {
            warn!(%team, teams = standings.len(), "Team not found");
            return Ok(TeamLookup::NotFound {
                available: standings
                    .keys()
                    .take(self.config.available_teams_hint)
                    .map(str::to_string)
                    .collect(),
            });
        };

        let data = Datasets {
            standings: &standings,
            corners: &corners,
            goals: &goals,
        };
        let mut rng = self.form_rng();
        match report::assemble(team, &ctx.league, &resolved.key, data, &mut rng) {
            Some(report) => {
                info!(
                    key = %resolved.key,
                    kind = ?resolved.kind,
                    position = report.position,
                    points = report.points,
                    has_corners = report.corners.is_some(),
                    has_goals = report.goals_stats.is_some(),
                    "Team record assembled"
                );
                Ok(TeamLookup::Found(report))
            }
            None => Ok(TeamLookup::NotFound {
                available: Vec::new(),
            }),
        }
    }

    /// Standings only, sorted by position.
    pub async fn league(&self, league: &str) -> Result<Vec<LeagueEntry>, ScrapeError> {
        let ctx = ScrapeContext::new(league);
        let span = ctx.span().clone();
        self.league_in(&ctx).instrument(span).await
    }

    async fn league_in(&self, ctx: &ScrapeContext) -> Result<Vec<LeagueEntry>, ScrapeError> {
        info!("League scrape requested");
        let urls = self.config.source_urls(&ctx.league)?;
        let table = bounded(
            "standings",
            self.config.pipeline_timeout(),
            standings::scrape(&self.fetcher, &urls.standings, ctx),
        )
        .await?;

        let mut entries: Vec<LeagueEntry> = table
            .iter()
            .map(|(name, record)| LeagueEntry {
                name: name.to_string(),
                position: record.position,
                points: record.points,
                matches_played: record.matches_played,
            })
            .collect();
        entries.sort_by_key(|entry| entry.position);
        info!(teams = entries.len(), "League standings ready");
        Ok(entries)
    }

    fn form_rng(&self) -> StdRng {
        match self.config.form_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Run one pipeline under a deadline.
async fn bounded<T>(
    pipeline: &'static str,
    limit: Duration,
    work: impl Future<Output = Result<T, ScrapeError>>,
) -> Result<T, ScrapeError> {
    match tokio::time::timeout(limit, work).await {
        Ok(result) => result,
        Err(_) => Err(ScrapeError::Timeout {
            pipeline,
            secs: limit.as_secs(),
        }),
    }
}

/// Absorb a non-essential pipeline failure into an empty dataset.
fn or_empty<R>(pipeline: &'static str, result: Result<TeamDataset<R>, ScrapeError>) -> TeamDataset<R> {
    result.unwrap_or_else(|e| {
        warn!(pipeline, error = %e, "Pipeline failed; continuing with empty dataset");
        TeamDataset::new()
    })
}
