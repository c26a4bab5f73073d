//! Reciprocal-overlap and mobile-element matching rules.
//!
//! A deletion is annotated with a RepeatMasker feature when the two intervals overlap
//! each other by at least half of their own size *and* both breakpoints sit close to the
//! feature's boundaries. How close depends on the element class: Alu elements are short
//! and must line up within 20 bp, L1 and SVA within 200 bp. Every other repeat class is
//! background and never matches.

use std::fmt::{self, Display};
use std::str::FromStr;

use num_traits::{PrimInt, Unsigned};
use serde::{Deserialize, Serialize};

use svannot_core::models::Interval;

/// Minimum overlap fraction, relative to both intervals, used by every call site.
pub const DEFAULT_RECIPROCAL_THRESHOLD: f64 = 0.5;
/// Maximum breakpoint distance for Alu elements.
pub const ALU_TOLERANCE: u64 = 20;
/// Maximum breakpoint distance for L1 elements.
pub const L1_TOLERANCE: u64 = 200;
/// Maximum breakpoint distance for SVA elements.
pub const SVA_TOLERANCE: u64 = 200;

///
/// Signed overlap length of two closed intervals: `min(ends) - max(starts) + 1`.
/// Zero or negative means no overlap.
///
pub fn overlap_length<I, T, U>(a: &Interval<I, T>, b: &Interval<I, U>) -> i64
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
    U: Eq + Clone + Send + Sync,
{
    a.overlap_len(b)
}

///
/// True when the overlap covers at least `threshold` of `a` and of `b`.
///
/// ```
/// use svannot_core::models::Interval;
/// use svannot_overlaprs::policy::reciprocal_overlap;
///
/// let a = Interval::new(1000u32, 1199, ()).unwrap();
/// let b = Interval::new(1005u32, 1195, ()).unwrap();
/// assert!(reciprocal_overlap(&a, &b, 0.5));
/// ```
pub fn reciprocal_overlap<I, T, U>(a: &Interval<I, T>, b: &Interval<I, U>, threshold: f64) -> bool
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
    U: Eq + Clone + Send + Sync,
{
    let overlap = overlap_length(a, b);
    if overlap <= 0 {
        return false;
    }
    let overlap = overlap as f64;
    overlap / size_f64(a) >= threshold && overlap / size_f64(b) >= threshold
}

#[inline]
fn size_f64<I, T>(iv: &Interval<I, T>) -> f64
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    iv.size().to_f64().unwrap_or(f64::INFINITY)
}

#[inline]
fn distance<I: PrimInt + Unsigned>(a: I, b: I) -> u64 {
    let d = if a > b { a - b } else { b - a };
    d.to_u64().unwrap_or(u64::MAX)
}

/// Mobile-element class of a repeat, derived from its RepeatMasker name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MeiClass {
    Alu,
    L1,
    #[serde(rename = "SVA")]
    Sva,
    Other,
}

impl MeiClass {
    ///
    /// Classify a RepeatMasker `repName`: `L1*` is L1, `Alu*` is Alu, `SVA*` is SVA,
    /// anything else is Other.
    ///
    pub fn from_rep_name(rep_name: &str) -> Self {
        if rep_name.starts_with("L1") {
            MeiClass::L1
        } else if rep_name.starts_with("Alu") {
            MeiClass::Alu
        } else if rep_name.starts_with("SVA") {
            MeiClass::Sva
        } else {
            MeiClass::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeiClass::Alu => "Alu",
            MeiClass::L1 => "L1",
            MeiClass::Sva => "SVA",
            MeiClass::Other => "Other",
        }
    }
}

impl Display for MeiClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MeiClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Alu" => Ok(MeiClass::Alu),
            "L1" => Ok(MeiClass::L1),
            "SVA" => Ok(MeiClass::Sva),
            "Other" => Ok(MeiClass::Other),
            _ => Err(format!("Unknown mobile element class: {}", s)),
        }
    }
}

/// Payloads stored in the index expose their element class through this trait.
pub trait FeatureClass {
    fn mei_class(&self) -> MeiClass;
}

impl FeatureClass for MeiClass {
    fn mei_class(&self) -> MeiClass {
        *self
    }
}

/// How to pick among several candidates that all pass the match rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The first passing candidate in scan order.
    #[default]
    FirstMatch,
    /// The passing candidate with the smallest `|Δstart| + |Δend|`; earlier wins ties.
    ClosestBoundary,
}

/// Thresholds applied by [`match_feature`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    pub reciprocal_threshold: f64,
    pub alu_tolerance: u64,
    pub l1_tolerance: u64,
    pub sva_tolerance: u64,
    pub tie_break: TieBreak,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        MatchPolicy {
            reciprocal_threshold: DEFAULT_RECIPROCAL_THRESHOLD,
            alu_tolerance: ALU_TOLERANCE,
            l1_tolerance: L1_TOLERANCE,
            sva_tolerance: SVA_TOLERANCE,
            tie_break: TieBreak::FirstMatch,
        }
    }
}

impl MatchPolicy {
    /// Breakpoint tolerance for a class; `None` for classes that never match.
    pub fn tolerance(&self, class: MeiClass) -> Option<u64> {
        match class {
            MeiClass::Alu => Some(self.alu_tolerance),
            MeiClass::L1 => Some(self.l1_tolerance),
            MeiClass::Sva => Some(self.sva_tolerance),
            MeiClass::Other => None,
        }
    }

    ///
    /// Check one candidate: reciprocal overlap, then both breakpoint distances against the
    /// tolerance of the candidate's class.
    ///
    pub fn accepts<I, T, U>(&self, query: &Interval<I, U>, candidate: &Interval<I, T>) -> bool
    where
        I: PrimInt + Unsigned + Send + Sync,
        T: Eq + Clone + Send + Sync + FeatureClass,
        U: Eq + Clone + Send + Sync,
    {
        let Some(tolerance) = self.tolerance(candidate.val().mei_class()) else {
            return false;
        };
        reciprocal_overlap(query, candidate, self.reciprocal_threshold)
            && distance(query.start(), candidate.start()) <= tolerance
            && distance(query.end(), candidate.end()) <= tolerance
    }
}

///
/// Find the feature matching `query` among `candidates`.
///
/// With [`TieBreak::FirstMatch`] the first accepted candidate wins, so the answer depends
/// on candidate order; [`crate::BinIndex`] always scans in the same order.
///
/// ```
/// use svannot_core::models::Interval;
/// use svannot_overlaprs::policy::{match_feature, MatchPolicy, MeiClass};
/// use svannot_overlaprs::{BinIndex, Overlapper};
///
/// let index = BinIndex::build(vec![Interval::new(1000u32, 1199, MeiClass::Alu).unwrap()]);
/// let query = Interval::new(1005u32, 1195, "del1").unwrap();
///
/// let hit = match_feature(&query, index.query_overlaps(&query), &MatchPolicy::default());
/// assert_eq!(hit.map(|iv| *iv.val()), Some(MeiClass::Alu));
/// ```
pub fn match_feature<'a, I, T, U, It>(
    query: &Interval<I, U>,
    candidates: It,
    policy: &MatchPolicy,
) -> Option<&'a Interval<I, T>>
where
    I: PrimInt + Unsigned + Send + Sync + 'a,
    T: Eq + Clone + Send + Sync + FeatureClass + 'a,
    U: Eq + Clone + Send + Sync,
    It: IntoIterator<Item = &'a Interval<I, T>>,
{
    let mut accepted = candidates
        .into_iter()
        .filter(|candidate| policy.accepts(query, candidate));

    match policy.tie_break {
        TieBreak::FirstMatch => accepted.next(),
        TieBreak::ClosestBoundary => {
            let mut best: Option<(u64, &'a Interval<I, T>)> = None;
            for candidate in accepted {
                let d = distance(query.start(), candidate.start())
                    .saturating_add(distance(query.end(), candidate.end()));
                if best.is_none_or(|(best_d, _)| d < best_d) {
                    best = Some((d, candidate));
                }
            }
            best.map(|(_, candidate)| candidate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BinIndex, Overlapper};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn feature(start: u32, end: u32, class: MeiClass) -> Interval<u32, MeiClass> {
        Interval::new(start, end, class).unwrap()
    }

    fn query(start: u32, end: u32) -> Interval<u32, &'static str> {
        Interval::new(start, end, "sv").unwrap()
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1000, 1199)]
    #[case(7, 70_000)]
    fn test_self_overlap(#[case] start: u32, #[case] end: u32) {
        let iv = query(start, end);
        assert_eq!(overlap_length(&iv, &iv), iv.size() as i64);
        assert!(reciprocal_overlap(&iv, &iv, DEFAULT_RECIPROCAL_THRESHOLD));
    }

    #[rstest]
    fn test_reciprocal_overlap_example() {
        let f = feature(1000, 1199, MeiClass::Alu);
        let q = query(1005, 1195);
        assert_eq!(overlap_length(&f, &q), 191);
        assert!(reciprocal_overlap(&f, &q, 0.9));
    }

    #[rstest]
    fn test_reciprocal_overlap_is_two_sided() {
        // covers all of the small interval, but only 10% of the large one
        let small = query(100, 199);
        let large = query(0, 999);
        assert!(!reciprocal_overlap(&small, &large, 0.5));
        assert!(reciprocal_overlap(&small, &large, 0.1));
    }

    #[rstest]
    fn test_reciprocal_overlap_at_exact_threshold() {
        // overlap 50 bases of two 100 base intervals
        let a = query(1, 100);
        let b = query(51, 150);
        assert!(reciprocal_overlap(&a, &b, 0.5));
        assert!(!reciprocal_overlap(&a, &b, 0.51));
    }

    #[rstest]
    fn test_disjoint_never_overlap() {
        let a = query(1, 100);
        let b = query(101, 200);
        assert_eq!(overlap_length(&a, &b), 0);
        assert!(!reciprocal_overlap(&a, &b, 0.0));
    }

    #[rstest]
    #[case("AluYa5", MeiClass::Alu)]
    #[case("L1HS", MeiClass::L1)]
    #[case("L1PA2", MeiClass::L1)]
    #[case("SVA_F", MeiClass::Sva)]
    #[case("MER41B", MeiClass::Other)]
    #[case("(CA)n", MeiClass::Other)]
    fn test_from_rep_name(#[case] name: &str, #[case] expected: MeiClass) {
        assert_eq!(MeiClass::from_rep_name(name), expected);
    }

    #[rstest]
    fn test_class_round_trip_through_str() {
        for class in [MeiClass::Alu, MeiClass::L1, MeiClass::Sva, MeiClass::Other] {
            assert_eq!(class.to_string().parse::<MeiClass>(), Ok(class));
        }
    }

    #[rstest]
    fn test_match_alu_example() {
        let features = vec![feature(1000, 1199, MeiClass::Alu)];
        let q = query(1005, 1195);
        let hit = match_feature(&q, &features, &MatchPolicy::default());
        assert_eq!(hit.map(|iv| *iv.val()), Some(MeiClass::Alu));
    }

    #[rstest]
    #[case(MeiClass::Alu, 21, None)]
    #[case(MeiClass::Alu, 20, Some(MeiClass::Alu))]
    #[case(MeiClass::L1, 150, Some(MeiClass::L1))]
    #[case(MeiClass::Sva, 200, Some(MeiClass::Sva))]
    #[case(MeiClass::Sva, 201, None)]
    #[case(MeiClass::Other, 0, None)]
    fn test_class_tolerance(
        #[case] class: MeiClass,
        #[case] shift: u32,
        #[case] expected: Option<MeiClass>,
    ) {
        let features = vec![feature(10_000, 12_999, class)];
        let q = query(10_000 + shift, 12_999 + shift);
        let hit = match_feature(&q, &features, &MatchPolicy::default());
        assert_eq!(hit.map(|iv| *iv.val()), expected);
    }

    #[rstest]
    fn test_tolerance_needs_reciprocal_overlap() {
        // endpoints within 200 bp but the overlap is under half of the query
        let features = vec![feature(1000, 1100, MeiClass::L1)];
        let q = query(900, 1250);
        assert_eq!(match_feature(&q, &features, &MatchPolicy::default()), None);
    }

    #[rstest]
    fn test_first_match_is_scan_order() {
        let features = vec![
            feature(5000, 6000, MeiClass::L1),
            feature(5010, 6010, MeiClass::Alu),
            feature(5001, 6001, MeiClass::L1),
        ];
        let q = query(5002, 6002);
        let policy = MatchPolicy::default();
        let hit = match_feature(&q, &features, &policy).unwrap();
        assert_eq!(hit.start(), 5000);

        let policy = MatchPolicy {
            tie_break: TieBreak::ClosestBoundary,
            ..MatchPolicy::default()
        };
        let hit = match_feature(&q, &features, &policy).unwrap();
        assert_eq!(hit.start(), 5001);
    }

    #[rstest]
    fn test_no_candidates() {
        let features: Vec<Interval<u32, MeiClass>> = vec![];
        let q = query(1, 10);
        assert_eq!(match_feature(&q, &features, &MatchPolicy::default()), None);
    }

    #[rstest]
    fn test_match_through_index() {
        let index = BinIndex::build(vec![
            feature(1_000_000, 1_006_000, MeiClass::Other),
            feature(1_000_050, 1_006_100, MeiClass::L1),
        ]);
        let q = query(1_000_000, 1_006_000);
        let hit = match_feature(&q, index.find_iter(q.start(), q.end()), &MatchPolicy::default());
        assert_eq!(hit.map(|iv| iv.start()), Some(1_000_050));
    }

    #[rstest]
    fn test_policy_from_toml_fragment() {
        let policy: MatchPolicy = toml::from_str("alu_tolerance = 5\ntie_break = \"closest_boundary\"").unwrap();
        assert_eq!(policy.alu_tolerance, 5);
        assert_eq!(policy.l1_tolerance, L1_TOLERANCE);
        assert_eq!(policy.tie_break, TieBreak::ClosestBoundary);
    }
}
