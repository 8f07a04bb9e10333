//! # Soccer Stats Scraper
//!
//! Scrapes league standings, corner averages and goal-threshold percentages
//! from soccerstats.com and joins them into one record per team.
//!
//! ## Usage
//!
//! ```sh
//! soccer_stats_scraper serve
//! soccer_stats_scraper team spain "Real Madrid"
//! soccer_stats_scraper league spain
//! ```
//!
//! ## Architecture
//!
//! Each request runs three independent pipelines:
//! 1. **Fetching**: download the page with retries ([`fetch`])
//! 2. **Extraction**: locate the right table heuristically and read its rows ([`scrapers`])
//! 3. **Assembly**: resolve the requested name and join the datasets ([`matcher`], [`report`])
//!
//! [`service`] runs the pipelines concurrently under deadlines and [`server`]
//! exposes them over HTTP.

use clap::Parser;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod fetch;
mod matcher;
mod models;
mod report;
mod scrapers;
mod server;
mod service;
mod utils;

use cli::{Cli, Command};
use config::ScraperConfig;
use service::ScrapeService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("soccer_stats_scraper starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.command, "Parsed CLI arguments");

    let mut config = ScraperConfig::load(args.config.as_deref()).await?;
    if let Command::Serve { bind: Some(bind) } = &args.command {
        config.bind = bind.clone();
    }
    info!(
        bind = %config.bind,
        max_attempts = config.max_attempts,
        pipeline_timeout_secs = config.pipeline_timeout().as_secs(),
        "Loaded configuration"
    );

    let fetcher = fetch::build_fetcher(&config)?;
    let service = ScrapeService::new(fetcher, config);

    let (status, body) = match args.command {
        Command::Serve { .. } => {
            server::serve(service).await?;
            return Ok(());
        }
        Command::Team { league, team } => {
            let source = service.config().source_name.clone();
            let outcome = service.team(&league, &team).await;
            server::team_response(&league, &team, &source, outcome)
        }
        Command::League { league } => {
            let outcome = service.league(&league).await;
            server::league_response(&league, outcome)
        }
    };
    println!("{}", serde_json::to_string_pretty(&body)?);

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        status = status.as_u16(),
        "Execution complete"
    );

    if status.is_server_error() {
        return Err(format!("scrape failed with status {status}").into());
    }
    Ok(())
}
