//! Table location by structural signature.
//!
//! A statistics page carries many tables (navigation, ads, mini-tables, the
//! one we want). Candidates are enumerated in document order and filtered by
//! a [`TableSignature`]: minimum row count, minimum cell count on at least one
//! row, and an optional header-text predicate. Whether a qualifying table
//! actually yields enough data is the extractor's call; callers iterate
//! [`candidates`] and move on when a table under-delivers.

use crate::models::Side;
use crate::utils::cell_text;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static HEADER_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("th").unwrap());
static DATA_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());
static ANY_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td, th").unwrap());

/// Header keywords (English and Spanish) for each corner split.
const HOME_KEYWORDS: &[&str] = &["home", "hogar"];
const AWAY_KEYWORDS: &[&str] = &["away", "lejos"];

/// Conditions a table must meet to be considered for a dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableSignature {
    /// Minimum number of `tr` rows, header included.
    pub min_rows: usize,
    /// Minimum number of cells on the widest row.
    pub min_cols: usize,
    /// Header text test over the table's `th` cells.
    pub header: Option<fn(&ElementRef) -> bool>,
}

impl TableSignature {
    pub fn matches(&self, table: &ElementRef) -> bool {
        let rows = rows(table);
        if rows.len() < self.min_rows {
            return false;
        }
        if self.min_cols > 0 && !rows.iter().any(|row| any_cells(row).len() >= self.min_cols) {
            return false;
        }
        self.header.is_none_or(|pred| pred(table))
    }
}

/// All tables satisfying `signature`, in document order.
pub fn candidates<'a>(
    document: &'a Html,
    signature: TableSignature,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    document
        .select(&TABLE)
        .filter(move |table| signature.matches(table))
}

/// Table carrying a fixed `id` attribute.
pub fn by_id<'a>(document: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    document
        .select(&TABLE)
        .find(|table| table.value().id() == Some(id))
}

/// Which corner split a table holds, judged by its `th` texts.
///
/// A home keyword anywhere wins over an away keyword.
pub fn corner_side(table: &ElementRef) -> Option<Side> {
    let headers: Vec<String> = table
        .select(&HEADER_CELL)
        .map(|th| cell_text(&th).to_lowercase())
        .collect();
    let has = |keywords: &[&str]| {
        headers
            .iter()
            .any(|text| keywords.iter().any(|k| text.contains(k)))
    };
    if has(HOME_KEYWORDS) {
        Some(Side::Home)
    } else if has(AWAY_KEYWORDS) {
        Some(Side::Away)
    } else {
        None
    }
}

pub fn has_corner_header(table: &ElementRef) -> bool {
    corner_side(table).is_some()
}

pub fn rows<'a>(table: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    table.select(&ROW).collect()
}

/// Every `td`/`th` cell of a row, in order.
pub fn any_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.select(&ANY_CELL).collect()
}

/// Only the `td` cells of a row.
pub fn data_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.select(&DATA_CELL).collect()
}
