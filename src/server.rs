//! HTTP surface.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /health` | liveness, no scraping |
//! | `GET /scrape/team/{league}/{team}` | assembled team record, 404 with a name hint, or 500 |
//! | `GET /scrape/league/{league}` | standings sorted by position |
//!
//! The same routes are also mounted under `/api` for clients of the earlier
//! deployment. Handlers only map [`ScrapeService`] outcomes to status codes
//! and JSON bodies.

use crate::error::ScrapeError;
use crate::fetch::{FetchDocument, HttpFetcher, RetryFetch};
use crate::service::{LeagueEntry, ScrapeService, TeamLookup};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info, warn};

pub type AppState<F> = Arc<ScrapeService<F>>;

const SERVICE_NAME: &str = "soccer_stats_scraper";

pub fn router<F>(state: AppState<F>) -> Router
where
    F: FetchDocument + 'static,
{
    let routes = Router::new()
        .route("/health", get(health))
        .route("/scrape/team/{league}/{team}", get(scrape_team::<F>))
        .route("/scrape/league/{league}", get(scrape_league::<F>));

    Router::new()
        .nest("/api", routes.clone())
        .merge(routes)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(service: ScrapeService<RetryFetch<HttpFetcher>>) -> Result<(), ScrapeError> {
    let bind = service.config().bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(%bind, "HTTP server listening");
    info!("Routes: GET /health, GET /scrape/team/{{league}}/{{team}}, GET /scrape/league/{{league}}");
    axum::serve(listener, router(Arc::new(service))).await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(health_body())
}

fn health_body() -> Value {
    json!({
        "status": "OK",
        "service": SERVICE_NAME,
        "timestamp": Local::now().to_rfc3339(),
    })
}

async fn scrape_team<F: FetchDocument>(
    State(service): State<AppState<F>>,
    Path((league, team)): Path<(String, String)>,
) -> (StatusCode, Json<Value>) {
    info!(%league, %team, "Team request");
    let outcome = service.team(&league, &team).await;
    let (status, body) = team_response(&league, &team, &service.config().source_name, outcome);
    (status, Json(body))
}

async fn scrape_league<F: FetchDocument>(
    State(service): State<AppState<F>>,
    Path(league): Path<String>,
) -> (StatusCode, Json<Value>) {
    info!(%league, "League request");
    let outcome = service.league(&league).await;
    let (status, body) = league_response(&league, outcome);
    (status, Json(body))
}

/// Map a team lookup to status and body.
pub fn team_response(
    league: &str,
    team: &str,
    source: &str,
    outcome: Result<TeamLookup, ScrapeError>,
) -> (StatusCode, Value) {
    match outcome {
        Ok(TeamLookup::Found(report)) => (
            StatusCode::OK,
            json!({
                "success": true,
                "data": report,
                "scraped_at": Local::now().to_rfc3339(),
                "source": source,
            }),
        ),
        Ok(TeamLookup::NotFound { available }) => {
            warn!(%league, %team, "Responding not found");
            (
                StatusCode::NOT_FOUND,
                json!({
                    "success": false,
                    "message": format!("Team '{team}' not found in {league}"),
                    "available_teams": available,
                }),
            )
        }
        Err(e) => {
            error!(%league, %team, error = %e, "Team scrape failed");
            failure("Failed to fetch statistics", &e)
        }
    }
}

/// Map a league overview to status and body.
pub fn league_response(league: &str, outcome: Result<Vec<LeagueEntry>, ScrapeError>) -> (StatusCode, Value) {
    match outcome {
        Ok(teams) => (
            StatusCode::OK,
            json!({
                "success": true,
                "total": teams.len(),
                "data": teams,
            }),
        ),
        Err(e) => {
            error!(%league, error = %e, "League scrape failed");
            failure("Failed to fetch league standings", &e)
        }
    }
}

fn failure(message: &str, e: &ScrapeError) -> (StatusCode, Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({
            "success": false,
            "message": message,
            "error": e.to_string(),
        }),
    )
}
