//! League standings extraction.
//!
//! The standings page has no stable table id and its column layout drifts
//! (rank columns, logo cells, form columns), so the table is found by
//! plausibility instead:
//!
//! 1. Any table with at least 15 rows is a candidate.
//! 2. Each row with at least 8 cells is scanned for a team-name cell,
//!    classified by the ordered [`CELL_RULES`].
//! 3. The purely numeric cells after that name are read as
//!    `MP W D L GF GA`; the row counts only if `W + D + L == MP` and `MP > 0`.
//!    If not, the scan continues with the next team-like cell of the row.
//! 4. A candidate becomes the result only if at least 15 rows were accepted
//!    (at most 20 are read). Otherwise the next candidate is tried.

use crate::error::ScrapeError;
use crate::fetch::FetchDocument;
use crate::models::{StandingRecord, StandingTally, StandingsTable};
use crate::scrapers::ScrapeContext;
use crate::scrapers::tables::{self, TableSignature};
use crate::utils::{cell_text, is_numeric_token};
use scraper::{ElementRef, Html};
use tracing::{Instrument, debug, info, warn};

/// Header row plus at least 14 team rows.
pub const MIN_TABLE_ROWS: usize = 15;
pub const MIN_ROW_CELLS: usize = 8;
/// Accepted rows needed before a table is trusted.
pub const MIN_TEAMS: usize = 15;
/// Rows read from one table at most.
pub const MAX_TEAMS: usize = 20;
const TALLY_WIDTH: usize = 6;

/// Header tokens that look like names but never are.
const STOP_WORDS: &[&str] = &["LEAGUES", "MATCHES", "STATS", "HOME", "AWAY"];

const SIGNATURE: TableSignature = TableSignature {
    min_rows: MIN_TABLE_ROWS,
    min_cols: 0,
    header: None,
};

/// Outcome of classifying one cell as a possible team name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    Blank,
    TooShort,
    Numeric,
    NoLetters,
    StopWord,
    TeamName,
}

/// Rejection rules, evaluated in order; the first that fires classifies the
/// cell. A cell no rule rejects is a [`CellClass::TeamName`].
pub const CELL_RULES: &[(CellClass, fn(&str) -> bool)] = &[
    (CellClass::Blank, is_blank),
    (CellClass::TooShort, is_too_short),
    (CellClass::Numeric, is_numeric_token),
    (CellClass::NoLetters, has_no_letters),
    (CellClass::StopWord, is_stop_word),
];

fn is_blank(text: &str) -> bool {
    text.is_empty()
}

fn is_too_short(text: &str) -> bool {
    text.chars().count() <= 2
}

fn has_no_letters(text: &str) -> bool {
    !text.chars().any(char::is_alphabetic)
}

fn is_stop_word(text: &str) -> bool {
    let upper = text.to_uppercase();
    STOP_WORDS.contains(&upper.as_str())
}

pub fn classify_cell(text: &str) -> CellClass {
    CELL_RULES
        .iter()
        .find(|(_, rule)| rule(text))
        .map(|(class, _)| *class)
        .unwrap_or(CellClass::TeamName)
}

/// Read `MP W D L GF GA` from the numeric cells of `tail`.
///
/// Non-numeric cells are skipped, extra numeric cells ignored. Returns `None`
/// when fewer than six numbers exist, one overflows, or the results do not
/// add up.
pub fn read_tally<S: AsRef<str>>(tail: &[S]) -> Option<StandingTally> {
    let numbers: Vec<u32> = tail
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|text| is_numeric_token(text))
        .take(TALLY_WIDTH)
        .map(|text| text.parse::<u32>())
        .collect::<Result<_, _>>()
        .ok()?;
    let [mp, w, d, l, gf, ga] = numbers[..] else {
        return None;
    };
    let tally = StandingTally {
        matches_played: mp,
        wins: w,
        draws: d,
        losses: l,
        goals_for: gf,
        goals_against: ga,
    };
    tally.is_consistent().then_some(tally)
}

/// First `(team, tally)` pair in a row's cell texts, scanning left to right.
pub fn match_row<S: AsRef<str>>(texts: &[S]) -> Option<(String, StandingTally)> {
    if texts.len() < MIN_ROW_CELLS {
        return None;
    }
    texts.iter().enumerate().find_map(|(i, text)| {
        let text: &str = text.as_ref();
        if classify_cell(text) != CellClass::TeamName {
            return None;
        }
        read_tally(&texts[i + 1..]).map(|tally| (text.to_string(), tally))
    })
}

/// Rows accepted from a single table.
#[derive(Debug, Default)]
pub struct TableYield {
    pub teams: StandingsTable,
    /// Accepted rows, duplicates included.
    pub accepted: usize,
}

/// Run the row scan over one table, header row skipped.
pub fn extract_table(table: &ElementRef) -> TableYield {
    let mut out = TableYield::default();
    for row in tables::rows(table).iter().skip(1) {
        let texts: Vec<String> = tables::any_cells(row).iter().map(cell_text).collect();
        if let Some((team, tally)) = match_row(&texts) {
            out.accepted += 1;
            let position = out.accepted as u32;
            if out.teams.contains(&team) {
                debug!(%team, position, "Duplicate standings row; overwriting earlier record");
            } else {
                debug!(%team, position, "Accepted standings row");
            }
            out.teams.insert(team, StandingRecord::new(position, tally));
            if out.accepted >= MAX_TEAMS {
                break;
            }
        }
    }
    out
}

/// Extract standings from a parsed page, trying candidate tables in order.
pub fn extract_document(document: &Html) -> StandingsTable {
    for (candidate, table) in tables::candidates(document, SIGNATURE).enumerate() {
        let found = extract_table(&table);
        if found.accepted >= MIN_TEAMS {
            info!(candidate, teams = found.teams.len(), "Standings extracted");
            return found.teams;
        }
        debug!(
            candidate,
            accepted = found.accepted,
            "Standings candidate below threshold; trying next table"
        );
    }
    warn!("No standings table reached the team threshold");
    StandingsTable::new()
}

pub fn extract(html: &str) -> StandingsTable {
    extract_document(&Html::parse_document(html))
}

/// Fetch and extract the standings page.
pub async fn scrape<F: FetchDocument>(
    fetcher: &F,
    url: &str,
    ctx: &ScrapeContext,
) -> Result<StandingsTable, ScrapeError> {
    async {
        let html = fetcher.fetch(url).await?;
        Ok::<_, ScrapeError>(extract(&html))
    }
    .instrument(ctx.pipeline_span("standings"))
    .await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A standings row in the site's layout: rank, name, then
    /// `GP W D L GF GA GD Pts` and a trailing form cell.
    pub(crate) fn row(rank: usize, team: &str, w: u32, d: u32, l: u32, gf: u32, ga: u32) -> String {
        let mp = w + d + l;
        let gd = gf as i64 - ga as i64;
        let pts = w * 3 + d;
        format!(
            "<tr><td>{rank}</td><td>{team}</td><td>{mp}</td><td>{w}</td><td>{d}</td>\
             <td>{l}</td><td>{gf}</td><td>{ga}</td><td>{gd}</td><td>{pts}</td><td>WWDLW</td></tr>"
        )
    }

    pub(crate) fn table(teams: &[&str]) -> String {
        let mut html = String::from(
            "<table><tr><th>#</th><th>Team</th><th>GP</th><th>W</th><th>D</th>\
             <th>L</th><th>GF</th><th>GA</th><th>GD</th><th>Pts</th><th>Form</th></tr>",
        );
        for (i, team) in teams.iter().enumerate() {
            let i = i as u32;
            html.push_str(&row(i as usize + 1, team, 12 - i / 2, i % 3, i / 2, 30 - i, 10 + i));
        }
        html.push_str("</table>");
        html
    }

    pub(crate) fn team_names(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix} {i:02}")).collect()
    }

    fn page(tables: &[String]) -> String {
        format!("<html><body>{}</body></html>", tables.concat())
    }

    fn refs(names: &[String]) -> Vec<&str> {
        names.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_cell_rules_in_order() {
        assert_eq!(classify_cell(""), CellClass::Blank);
        assert_eq!(classify_cell("12"), CellClass::TooShort);
        assert_eq!(classify_cell("123"), CellClass::Numeric);
        assert_eq!(classify_cell("+12"), CellClass::NoLetters);
        assert_eq!(classify_cell("Home"), CellClass::StopWord);
        assert_eq!(classify_cell("stats"), CellClass::StopWord);
        assert_eq!(classify_cell("Home United"), CellClass::TeamName);
        assert_eq!(classify_cell("Getafe"), CellClass::TeamName);
    }

    #[test]
    fn test_read_tally_skips_non_numeric() {
        let tally = read_tally(&["10", "x", "6", "2", "2", "+5", "20", "15", "5"]).unwrap();
        assert_eq!(tally.matches_played, 10);
        assert_eq!(tally.goals_for, 20);
        assert_eq!(tally.goals_against, 15);
    }

    #[test]
    fn test_read_tally_rejects_inconsistent_results() {
        assert!(read_tally(&["10", "6", "2", "1", "20", "15"]).is_none());
        assert!(read_tally(&["0", "0", "0", "0", "0", "0"]).is_none());
        assert!(read_tally(&["10", "6", "2", "2", "20"]).is_none());
        assert!(read_tally(&["99999999999", "6", "2", "2", "20", "1"]).is_none());
    }

    #[test]
    fn test_match_row_continues_past_false_candidates() {
        // "LEAGUES" is a stop word; "Promo" has no valid tally after it
        // because its numbers do not add up; "Osasuna" does.
        let texts = [
            "LEAGUES", "Promo", "9", "9", "9", "Osasuna", "12", "5", "4", "3", "14", "11",
        ];
        let (team, tally) = match_row(&texts).unwrap();
        assert_eq!(team, "Osasuna");
        assert_eq!(tally.wins, 5);
    }

    #[test]
    fn test_match_row_requires_eight_cells() {
        assert!(match_row(&["Girona", "3", "2", "1", "0", "5", "2"]).is_none());
    }

    #[test]
    fn test_sixteen_rows_yield_sixteen_positions() {
        let names = team_names("Club", 16);
        let doc = Html::parse_document(&page(&[table(&refs(&names))]));
        let data = extract_document(&doc);

        assert_eq!(data.len(), 16);
        for (i, (team, record)) in data.iter().enumerate() {
            assert_eq!(team, names[i]);
            assert_eq!(record.position, i as u32 + 1);
            assert_eq!(record.wins + record.draws + record.losses, record.matches_played);
            assert_eq!(record.points, record.wins * 3 + record.draws);
            assert_eq!(
                record.goal_difference,
                record.goals_for as i64 - record.goals_against as i64
            );
        }
    }

    #[test]
    fn test_positions_follow_acceptance_not_physical_rows() {
        let names = team_names("Side", 16);
        let mut html = table(&refs(&names));
        // An invalid row between the 1st and 2nd teams must not consume a position.
        let bogus = "<tr><td>x</td><td>Bogus FC</td><td>9</td><td>1</td><td>1</td>\
                     <td>1</td><td>3</td><td>3</td><td>0</td><td>4</td></tr>";
        let split = html.find("</tr>").unwrap() + 5;
        let split = split + html[split..].find("</tr>").unwrap() + 5;
        html.insert_str(split, bogus);

        let data = extract(&page(&[html]));
        assert!(!data.contains("Bogus FC"));
        assert_eq!(data.get("Side 01").unwrap().position, 2);
        assert_eq!(data.len(), 16);
    }

    #[test]
    fn test_under_threshold_table_is_skipped() {
        let small = table(&refs(&team_names("Minor", 10)));
        // Padding rows make the first table structurally eligible.
        let small = small.replace(
            "</table>",
            &"<tr><td>-</td><td>-</td></tr>".repeat(6),
        ) + "</table>";
        let big = table(&refs(&team_names("Major", 18)));

        let data = extract(&page(&[small, big]));
        assert_eq!(data.len(), 18);
        assert!(data.keys().all(|k| k.starts_with("Major")));
        assert_eq!(data.get("Major 00").unwrap().position, 1);
    }

    #[test]
    fn test_only_under_threshold_tables_yield_empty() {
        let small = table(&refs(&team_names("Minor", 14)));
        assert!(extract(&page(&[small])).is_empty());
    }

    #[test]
    fn test_stops_after_twenty_teams() {
        let data = extract(&page(&[table(&refs(&team_names("Team", 24)))]));
        assert_eq!(data.len(), MAX_TEAMS);
        assert!(!data.contains("Team 20"));
    }

    #[test]
    fn test_no_tables_yields_empty() {
        assert!(extract("<html><body><p>maintenance</p></body></html>").is_empty());
    }
}
