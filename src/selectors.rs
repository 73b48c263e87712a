//! Derived view selectors.
//!
//! Pure functions over collection snapshots. No store access, no mutation,
//! input order preserved; cheap enough to recompute on every keystroke or
//! category tap at the collection sizes this crate holds.

use crate::types::{CategoryFilter, Draft, Trend};

/// Trends whose category passes the filter. `All` is the identity.
pub fn filter_by_category(trends: &[Trend], filter: CategoryFilter) -> Vec<&Trend> {
    trends
        .iter()
        .filter(|trend| filter.matches(trend.category))
        .collect()
}

/// Trends whose name contains the query, case-insensitively. An empty
/// query is the identity.
pub fn search_trends<'a>(trends: &'a [Trend], query: &str) -> Vec<&'a Trend> {
    if query.is_empty() {
        return trends.iter().collect();
    }
    let needle = query.to_lowercase();
    trends
        .iter()
        .filter(|trend| trend.name.to_lowercase().contains(&needle))
        .collect()
}

/// Intersection of the category filter and the text search.
pub fn filter_trends<'a>(
    trends: &'a [Trend],
    filter: CategoryFilter,
    query: &str,
) -> Vec<&'a Trend> {
    let needle = query.to_lowercase();
    trends
        .iter()
        .filter(|trend| filter.matches(trend.category))
        .filter(|trend| needle.is_empty() || trend.name.to_lowercase().contains(&needle))
        .collect()
}

/// Drafts whose caption contains the query, case-insensitively. An empty
/// query is the identity.
pub fn search_drafts<'a>(drafts: &'a [Draft], query: &str) -> Vec<&'a Draft> {
    if query.is_empty() {
        return drafts.iter().collect();
    }
    let needle = query.to_lowercase();
    drafts
        .iter()
        .filter(|draft| draft.caption.to_lowercase().contains(&needle))
        .collect()
}
