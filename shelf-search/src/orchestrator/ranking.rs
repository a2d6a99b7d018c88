//! Similarity ordering and per-domain thresholds.
//!
//! Every group leaves the dispatcher sorted by descending similarity with
//! ties kept in the order the collaborator returned them. Account and list
//! groups are additionally cut at a fixed similarity threshold:
//!
//! ```text
//! user:  similarity > user_similarity_threshold  (0.5 by default)
//! list:  similarity > list_similarity_threshold  (0.1 by default)
//! book:  no cut here; the catalog applies min_confidence itself
//! ```

use crate::types::{ScoredResult, SearchResultGroup};

use super::dedup::deduplicate;

/// Stable sort by descending similarity.
///
/// Uses a total order, so a stray NaN sorts last instead of breaking the
/// comparator.
pub fn sort_by_similarity(results: &mut [ScoredResult]) {
    results.sort_by(|a, b| {
        nan_as_lowest(b.similarity).total_cmp(&nan_as_lowest(a.similarity))
    });
}

fn nan_as_lowest(similarity: f64) -> f64 {
    if similarity.is_nan() {
        f64::NEG_INFINITY
    } else {
        similarity
    }
}

/// Keep results scoring strictly above `threshold`.
pub fn above_threshold(results: Vec<ScoredResult>, threshold: f64) -> Vec<ScoredResult> {
    results
        .into_iter()
        .filter(|result| result.similarity > threshold)
        .collect()
}

/// Sort then deduplicate a list of results.
pub fn rank(mut results: Vec<ScoredResult>) -> Vec<ScoredResult> {
    sort_by_similarity(&mut results);
    let ranked = deduplicate(results);
    debug_assert!(is_ranked(&ranked));
    ranked
}

/// Rank a group in place, keeping its label.
pub fn rank_group(group: SearchResultGroup) -> SearchResultGroup {
    SearchResultGroup {
        source: group.source,
        results: rank(group.results),
    }
}

/// Build an account or list group: threshold cut, sort, deduplicate.
pub fn threshold_group(
    source: &str,
    results: Vec<ScoredResult>,
    threshold: f64,
) -> SearchResultGroup {
    let total = results.len();
    let kept = rank(above_threshold(results, threshold));
    tracing::debug!(source, total, kept = kept.len(), threshold, "applied similarity threshold");
    SearchResultGroup::new(source, kept)
}

/// Whether `results` satisfies the descending-similarity invariant.
pub fn is_ranked(results: &[ScoredResult]) -> bool {
    results
        .windows(2)
        .all(|pair| nan_as_lowest(pair[0].similarity) >= nan_as_lowest(pair[1].similarity))
}
