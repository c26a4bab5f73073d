//! Non-redundant length of a set of closed, 1-based spans.

use serde::{Deserialize, Serialize};

/// How overlapping spans are merged when measuring coverage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageMode {
    /// Compare each span with its predecessor in start order only. This is the
    /// established behaviour of the annotation reports and is kept for output parity.
    #[default]
    Neighbor,
    /// Exact union of all spans.
    Union,
}

///
/// Merged length of `spans` (closed `(start, end)` pairs) under `mode`.
///
/// The slice is sorted in place by start; the sort is stable.
///
pub fn merged_length(spans: &mut [(u64, u64)], mode: CoverageMode) -> u64 {
    match mode {
        CoverageMode::Neighbor => neighbor_merged_length(spans),
        CoverageMode::Union => union_length(spans),
    }
}

///
/// Walk the spans in start order and add, for each one, only the part past the end of
/// the immediately preceding span when the two overlap, or its full length otherwise.
///
/// Only the previous span is looked at, so with three or more interleaved spans the
/// result can differ from the true union: a span nested inside its predecessor resets
/// the reference end, and the following span may be counted twice. Use
/// [`union_length`] when an exact answer is needed.
///
pub fn neighbor_merged_length(spans: &mut [(u64, u64)]) -> u64 {
    spans.sort_by_key(|&(start, _)| start);

    let mut iter = spans.iter();
    let Some(&(first_start, first_end)) = iter.next() else {
        return 0;
    };

    let mut merged = first_end - first_start + 1;
    let (mut prev_start, mut prev_end) = (first_start, first_end);
    for &(start, end) in iter {
        if start <= prev_end && end >= prev_start {
            if end > prev_end {
                merged += end - prev_end;
            }
        } else {
            merged += end - start + 1;
        }
        prev_start = start;
        prev_end = end;
    }

    merged
}

/// Exact number of bases covered by the union of `spans`.
pub fn union_length(spans: &mut [(u64, u64)]) -> u64 {
    spans.sort_unstable();

    let mut iter = spans.iter();
    let Some(&(mut run_start, mut run_end)) = iter.next() else {
        return 0;
    };

    let mut total = 0;
    for &(start, end) in iter {
        if start <= run_end.saturating_add(1) {
            run_end = run_end.max(end);
        } else {
            total += run_end - run_start + 1;
            run_start = start;
            run_end = end;
        }
    }
    total + run_end - run_start + 1
}
