//! Goal-threshold statistics extraction.
//!
//! Unlike standings and corners, the goals table has a stable identity
//! (`<table id="btable">`), so no heuristics are needed. Percentages are
//! kept as the site prints them (`"67%"`).

use crate::error::ScrapeError;
use crate::fetch::FetchDocument;
use crate::models::{GoalsRecord, GoalsTable};
use crate::scrapers::ScrapeContext;
use crate::scrapers::tables;
use crate::utils::cell_text;
use scraper::Html;
use tracing::{Instrument, info, warn};

pub const TABLE_ID: &str = "btable";
pub const MIN_ROW_CELLS: usize = 10;

// Zero-based columns.
const TEAM_COL: usize = 0;
const OVER_1_5_COL: usize = 4;
const OVER_2_5_COL: usize = 5;
const OVER_3_5_COL: usize = 6;
const BTS_COL: usize = 9;

pub fn extract_document(document: &Html) -> GoalsTable {
    let mut out = GoalsTable::new();
    let Some(table) = tables::by_id(document, TABLE_ID) else {
        warn!(table_id = TABLE_ID, "Goals table not found");
        return out;
    };

    for row in tables::rows(&table).iter().skip(1) {
        let cells = tables::data_cells(row);
        if cells.len() < MIN_ROW_CELLS {
            continue;
        }
        let text = |col: usize| cell_text(&cells[col]);
        out.insert(
            text(TEAM_COL),
            GoalsRecord {
                over_1_5: text(OVER_1_5_COL),
                over_2_5: text(OVER_2_5_COL),
                over_3_5: text(OVER_3_5_COL),
                bts: text(BTS_COL),
            },
        );
    }

    info!(teams = out.len(), "Goals extracted");
    out
}

pub fn extract(html: &str) -> GoalsTable {
    extract_document(&Html::parse_document(html))
}

/// Fetch and extract the goals page.
pub async fn scrape<F: FetchDocument>(
    fetcher: &F,
    url: &str,
    ctx: &ScrapeContext,
) -> Result<GoalsTable, ScrapeError> {
    async {
        let html = fetcher.fetch(url).await?;
        Ok::<_, ScrapeError>(extract(&html))
    }
    .instrument(ctx.pipeline_span("goals"))
    .await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn goals_table(id: &str, rows: &[(&str, [&str; 4])]) -> String {
        let mut html = format!(
            "<table id=\"{id}\"><tr><th>Team</th><th>GP</th><th>Avg</th><th>O0.5</th>\
             <th>O1.5</th><th>O2.5</th><th>O3.5</th><th>O4.5</th><th>O5.5</th><th>BTS</th></tr>"
        );
        for (team, [o15, o25, o35, bts]) in rows {
            html.push_str(&format!(
                "<tr><td> {team} </td><td>15</td><td>2.60</td><td>93%</td><td>{o15}</td>\
                 <td>{o25}</td><td>{o35}</td><td>13%</td><td>7%</td><td>{bts}</td></tr>"
            ));
        }
        html.push_str("</table>");
        html
    }

    #[test]
    fn test_fixed_columns() {
        let page = goals_table(
            TABLE_ID,
            &[
                ("Villarreal", ["80%", "60%", "33%", "47%"]),
                ("Alaves", ["67%", "40%", "13%", "53%"]),
            ],
        );
        let data = extract(&page);
        assert_eq!(data.len(), 2);
        assert_eq!(
            data.get("Villarreal"),
            Some(&GoalsRecord {
                over_1_5: "80%".to_string(),
                over_2_5: "60%".to_string(),
                over_3_5: "33%".to_string(),
                bts: "47%".to_string(),
            })
        );
        assert_eq!(data.keys().collect::<Vec<_>>(), vec!["Villarreal", "Alaves"]);
    }

    #[test]
    fn test_missing_table_yields_empty() {
        let page = goals_table("stats", &[("Villarreal", ["80%", "60%", "33%", "47%"])]);
        assert!(extract(&page).is_empty());
    }

    #[test]
    fn test_short_rows_skipped() {
        let page = goals_table(TABLE_ID, &[("Leganes", ["1", "2", "3", "4"])]).replace(
            "</table>",
            "<tr><td>Total</td><td>300</td><td>2.5</td></tr></table>",
        );
        let data = extract(&page);
        assert_eq!(data.len(), 1);
        assert!(!data.contains("Total"));
    }
}
