//! Best-hit selection.

use rayon::prelude::*;

use crate::assembler::QueryHits;
use crate::coverage::CoverageMode;
use crate::hit::Hit;

/// Best hit under the default coverage mode. See [`select_best_hit_with`].
pub fn select_best_hit(hits: &[Hit]) -> Option<&Hit> {
    select_best_hit_with(hits, CoverageMode::default())
}

///
/// The hit with the highest `query_coverage × subject_coverage`.
///
/// Only a strictly greater score replaces the current best, so on ties the earliest
/// hit wins. Hits scoring `0.0` (or `NaN`) are never selected; `None` comes back
/// when no hit scores above zero.
///
pub fn select_best_hit_with(hits: &[Hit], mode: CoverageMode) -> Option<&Hit> {
    let mut best: Option<&Hit> = None;
    let mut max_score = 0.0;
    for hit in hits {
        let score = hit.score_with(mode);
        if score > max_score {
            max_score = score;
            best = Some(hit);
        }
    }
    best
}

///
/// Best hit of every query, computed in parallel. The output follows the order of
/// `groups`; queries without a positive-scoring hit are dropped.
///
pub fn best_hits_par(groups: &[QueryHits], mode: CoverageMode) -> Vec<&Hit> {
    groups
        .par_iter()
        .filter_map(|group| group.best_hit_with(mode))
        .collect()
}
