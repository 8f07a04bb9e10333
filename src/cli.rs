//! Command-line interface definitions.
//!
//! Every option can also come from the environment, which is how the service
//! is configured when deployed.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Soccer statistics scraper and HTTP service.
///
/// # Examples
///
/// ```sh
/// # Run the HTTP service
/// soccer_stats_scraper serve --bind 0.0.0.0:5000
///
/// # One-off lookups, printed as JSON
/// soccer_stats_scraper team spain "Real Madrid"
/// soccer_stats_scraper league england
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long, global = true, env = "SOCCER_STATS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Serve the HTTP endpoints
    Serve {
        /// Listen address, overrides `bind` from the config file
        #[arg(short, long, env = "SOCCER_STATS_BIND")]
        bind: Option<String>,
    },
    /// Scrape one team and print its record
    Team { league: String, team: String },
    /// Scrape a league and print its standings
    League { league: String },
}
