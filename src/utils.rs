//! Small text helpers shared by the extractors and logging.
//!
//! - Cell text normalization (whitespace)
//! - Locale-tolerant numeric parsing with zero defaults
//! - String truncation for log previews

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Visible text of a table cell: trimmed, inner whitespace runs collapsed.
///
/// `&nbsp;` padding is common on the statistics site and counts as whitespace.
pub fn cell_text(cell: &ElementRef) -> String {
    normalize_text(&cell.text().collect::<String>())
}

pub fn normalize_text(raw: &str) -> String {
    WHITESPACE_RUN.replace_all(raw.trim(), " ").into_owned()
}

/// `true` for a non-empty string made only of ASCII digits.
pub fn is_numeric_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Normalize a locale-formatted decimal and parse it.
///
/// Contract: a comma is always the decimal separator (`"3,5"` is `3.5`).
/// Thousands separators are not supported. Anything that does not read as a
/// finite, non-negative number yields `0.0`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_decimal("3,5"), 3.5);
/// assert_eq!(parse_decimal("abc"), 0.0);
/// ```
pub fn parse_decimal(text: &str) -> f64 {
    let value: f64 = parse_or_default(text);
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

/// Parse a count under the same normalization as [`parse_decimal`].
///
/// A fractional value such as `"3,5"` is not a count and yields `0`.
pub fn parse_count(text: &str) -> u32 {
    parse_or_default(text)
}

fn parse_or_default<T>(text: &str) -> T
where
    T: std::str::FromStr + Default,
{
    let text = text.trim();
    if text.is_empty() {
        return T::default();
    }
    text.replace(',', ".").parse().unwrap_or_default()
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes (backed off to a char boundary)
/// with an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
