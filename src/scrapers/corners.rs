//! Corner statistics extraction.
//!
//! The corners page publishes one table per venue split. A table is picked up
//! when one of its `th` cells mentions home/away (or the Spanish
//! hogar/lejos); that keyword decides which split the rows fill. Both tables
//! write into the same dataset, so a team seen in both ends up with both
//! splits, and a team seen in only one keeps zeros for the other.
//!
//! Row layout after the two header rows: `team | GP | CF | CA | ...` with at
//! least 7 `td` cells. Values may use a decimal comma.

use crate::error::ScrapeError;
use crate::fetch::FetchDocument;
use crate::models::{CornerSplit, CornerTable, Side};
use crate::scrapers::ScrapeContext;
use crate::scrapers::tables::{self, TableSignature};
use crate::utils::{cell_text, parse_count, parse_decimal};
use scraper::{ElementRef, Html};
use tracing::{Instrument, debug, info, warn};

const HEADER_ROWS: usize = 2;
pub const MIN_ROW_CELLS: usize = 7;

const SIGNATURE: TableSignature = TableSignature {
    min_rows: 0,
    min_cols: 0,
    header: Some(tables::has_corner_header),
};

/// Fill `side` of every team row in one corner table.
pub fn extract_table(table: &ElementRef, side: Side, out: &mut CornerTable) {
    for row in tables::rows(table).iter().skip(HEADER_ROWS) {
        let cells = tables::data_cells(row);
        if cells.len() < MIN_ROW_CELLS {
            continue;
        }
        let team = cell_text(&cells[0]);
        if team.to_lowercase().contains("average") {
            continue;
        }
        let split = CornerSplit {
            matches: parse_count(&cell_text(&cells[1])),
            corners_for: parse_decimal(&cell_text(&cells[2])),
            corners_against: parse_decimal(&cell_text(&cells[3])),
        };
        *out.entry_or_default(&team).split_mut(side) = split;
    }
}

pub fn extract_document(document: &Html) -> CornerTable {
    let mut out = CornerTable::new();
    let mut tables_used = 0usize;
    for table in tables::candidates(document, SIGNATURE) {
        let Some(side) = tables::corner_side(&table) else {
            continue;
        };
        debug!(?side, "Reading corner table");
        extract_table(&table, side, &mut out);
        tables_used += 1;
    }
    if out.is_empty() {
        warn!(tables_used, "No corner rows extracted");
    } else {
        info!(tables_used, teams = out.len(), "Corners extracted");
    }
    out
}

pub fn extract(html: &str) -> CornerTable {
    extract_document(&Html::parse_document(html))
}

/// Fetch and extract the corners page.
pub async fn scrape<F: FetchDocument>(
    fetcher: &F,
    url: &str,
    ctx: &ScrapeContext,
) -> Result<CornerTable, ScrapeError> {
    async {
        let html = fetcher.fetch(url).await?;
        Ok::<_, ScrapeError>(extract(&html))
    }
    .instrument(ctx.pipeline_span("corners"))
    .await
}
