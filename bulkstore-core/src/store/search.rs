/*
    search.rs - Substring search over message slots

    Scans slots in index order and returns the first N matching indices.
    No ranking: results are always ascending.

    Case handling is explicit via SearchMode. CaseInsensitive lowercases
    both the term and the slot before matching.
*/

use serde::{Deserialize, Serialize};

/// How `search` compares the term against slot contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Literal substring match
    CaseSensitive,
    /// Substring match after lowercasing both sides
    #[default]
    CaseInsensitive,
}

impl SearchMode {
    fn matches(&self, slot: &str, term: &str) -> bool {
        match self {
            SearchMode::CaseSensitive => slot.contains(term),
            SearchMode::CaseInsensitive => slot.to_lowercase().contains(term),
        }
    }

    fn normalize(&self, term: &str) -> String {
        match self {
            SearchMode::CaseSensitive => term.to_string(),
            SearchMode::CaseInsensitive => term.to_lowercase(),
        }
    }
}

/// Collect up to `max_results` indices of slots containing `term`.
///
/// An empty term matches nothing, and empty slots never match.
pub fn find_matches<'a, I>(slots: I, term: &str, max_results: usize, mode: SearchMode) -> Vec<usize>
where
    I: IntoIterator<Item = &'a String>,
{
    if term.is_empty() || max_results == 0 {
        return Vec::new();
    }

    let term = mode.normalize(term);

    slots
        .into_iter()
        .enumerate()
        .filter(|(_, slot)| !slot.is_empty() && mode.matches(slot, &term))
        .map(|(index, _)| index)
        .take(max_results)
        .collect()
}
