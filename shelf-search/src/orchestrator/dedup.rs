//! Duplicate removal within a result group.
//!
//! Runs after ranking, so the first occurrence of a key is the one with the
//! highest similarity and it is the one kept. Relative order of the
//! survivors is preserved.

use std::collections::HashSet;

use crate::types::ScoredResult;

use super::key_normalize::normalize_key;

/// Drop every result whose normalised key was already seen earlier in
/// `results`.
pub fn deduplicate(results: Vec<ScoredResult>) -> Vec<ScoredResult> {
    let before = results.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(before);
    let deduped: Vec<ScoredResult> = results
        .into_iter()
        .filter(|result| seen.insert(normalize_key(&result.record)))
        .collect();

    let dropped = before - deduped.len();
    if dropped > 0 {
        tracing::debug!(dropped, "removed duplicate results");
    }
    deduped
}
