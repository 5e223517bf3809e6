//! Deterministic score ranking of candidates.

use crate::candidate::Candidate;
use std::cmp::Ordering;

fn rank_cmp_desc(items: &[Candidate], a: usize, b: usize) -> Ordering {
    items[b]
        .score
        .total_cmp(&items[a].score)
        .then_with(|| a.cmp(&b))
}

/// Returns candidate indices sorted by descending score.
///
/// Equal scores keep their scan order, so the ranking is a pure function of
/// the input grid.
pub(crate) fn argsort_desc(items: &[Candidate]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| rank_cmp_desc(items, a, b));
    order
}
