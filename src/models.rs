//! Data models for extracted team statistics.
//!
//! - [`StandingRecord`]: one row of a league table
//! - [`CornerRecord`] / [`CornerSplit`]: home and away corner averages
//! - [`GoalsRecord`]: goal-threshold percentages, kept as source text
//! - [`TeamDataset`]: insertion-ordered mapping from team name to record
//!
//! Field names are camelCase on the wire to match the existing consumers of
//! the JSON output. Goal fields keep their snake_case names for the same
//! reason.

use serde::{Deserialize, Serialize};

/// A team's league-table entry.
///
/// `goal_difference` and `points` are derived at construction; build it with
/// [`StandingRecord::new`] so they never disagree with the raw tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingRecord {
    /// 1-based, in the order rows were accepted.
    pub position: u32,
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

/// The six raw tallies read from a standings row, in source column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandingTally {
    pub matches_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl StandingTally {
    /// A row is plausible when at least one match was played and the
    /// results add up to the match count.
    pub fn is_consistent(&self) -> bool {
        self.matches_played > 0
            && u64::from(self.wins) + u64::from(self.draws) + u64::from(self.losses)
                == u64::from(self.matches_played)
    }
}

impl StandingRecord {
    pub fn new(position: u32, tally: StandingTally) -> Self {
        Self {
            position,
            matches_played: tally.matches_played,
            wins: tally.wins,
            draws: tally.draws,
            losses: tally.losses,
            goals_for: tally.goals_for,
            goals_against: tally.goals_against,
            goal_difference: i64::from(tally.goals_for) - i64::from(tally.goals_against),
            points: tally.wins.saturating_mul(3).saturating_add(tally.draws),
        }
    }
}

/// Corner averages for one venue split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerSplit {
    pub matches: u32,
    pub corners_for: f64,
    pub corners_against: f64,
}

/// Home and away corner splits for one team. A split the source never
/// reported stays at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerRecord {
    pub home: CornerSplit,
    pub away: CornerSplit,
}

/// Which venue split a corner table describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl CornerRecord {
    pub fn split_mut(&mut self, side: Side) -> &mut CornerSplit {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }
}

/// Goal-threshold percentages, verbatim from the source (e.g. `"67%"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalsRecord {
    pub over_1_5: String,
    pub over_2_5: String,
    pub over_3_5: String,
    pub bts: String,
}

/// Insertion-ordered mapping from team name to record.
///
/// Keys are the team names exactly as extracted. Order is the order in which
/// teams were first inserted, which makes every iteration (and therefore the
/// fuzzy matcher's tie-break) stable for a given document. Re-inserting a key
/// replaces its record in place.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamDataset<R> {
    entries: Vec<(String, R)>,
}

impl<R> Default for TeamDataset<R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<R> TeamDataset<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, team: &str) -> Option<&R> {
        self.entries
            .iter()
            .find(|(key, _)| key == team)
            .map(|(_, record)| record)
    }

    pub fn contains(&self, team: &str) -> bool {
        self.get(team).is_some()
    }

    /// Insert or replace, keeping the original slot on replace.
    pub fn insert(&mut self, team: String, record: R) {
        match self.entries.iter_mut().find(|(key, _)| *key == team) {
            Some((_, slot)) => *slot = record,
            None => self.entries.push((team, record)),
        }
    }

    /// Mutable access to a team's record, inserting `R::default()` first if
    /// the team is new.
    pub fn entry_or_default(&mut self, team: &str) -> &mut R
    where
        R: Default,
    {
        let idx = match self.entries.iter().position(|(key, _)| key == team) {
            Some(idx) => idx,
            None => {
                self.entries.push((team.to_string(), R::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &R)> {
        self.entries.iter().map(|(key, record)| (key.as_str(), record))
    }
}

pub type StandingsTable = TeamDataset<StandingRecord>;
pub type CornerTable = TeamDataset<CornerRecord>;
pub type GoalsTable = TeamDataset<GoalsRecord>;
