//! Team name resolution.
//!
//! Callers type names loosely ("madrid", "Real Madrid CF", "BETIS"); dataset
//! keys are whatever the page printed. Resolution is two-pass:
//!
//! 1. case-insensitive exact match,
//! 2. case-insensitive containment in either direction.
//!
//! An exact hit anywhere in the dataset beats any containment hit. Among
//! several containment hits the first key in dataset order wins; datasets
//! keep extraction order, so the choice is stable for a given page.

use crate::models::TeamDataset;
use itertools::Itertools;
use tracing::debug;

/// How a query was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Partial,
}

/// Canonical dataset key chosen for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTeam {
    pub key: String,
    pub kind: MatchKind,
}

/// Resolve `query` against the keys of `data`. `None` means not found.
pub fn resolve<R>(query: &str, data: &TeamDataset<R>) -> Option<ResolvedTeam> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    if let Some(key) = data.keys().find(|key| key.to_lowercase() == needle) {
        return Some(ResolvedTeam {
            key: key.to_string(),
            kind: MatchKind::Exact,
        });
    }

    let partial: Vec<&str> = data
        .keys()
        .filter(|key| {
            let key = key.to_lowercase();
            key.contains(&needle) || needle.contains(&key)
        })
        .collect();
    if partial.len() > 1 {
        debug!(
            query,
            candidates = %partial.iter().join(", "),
            "Ambiguous team name; taking first in extraction order"
        );
    }
    partial.first().map(|key| ResolvedTeam {
        key: key.to_string(),
        kind: MatchKind::Partial,
    })
}
