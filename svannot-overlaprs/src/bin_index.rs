use std::collections::BTreeMap;
use std::collections::btree_map;

use log::{debug, warn};
use num_traits::{PrimInt, Unsigned};
use thiserror::Error;

use super::Overlapper;
use svannot_core::models::Interval;

/// Number of levels in the bin hierarchy. Level 0 is the finest.
pub const NUM_BIN_LEVELS: usize = 6;
/// Shift turning a coordinate into a level-0 cell (16Kb cells).
pub const BIN_FIRST_SHIFT: u32 = 14;
/// Extra shift per level; each level is 8 times coarser than the one below.
pub const BIN_NEXT_SHIFT: u32 = 3;
/// Size of the bin id space.
pub const NUM_BINS: u32 = 37_449;

/// Start of each level's id range, finest level first: `[4681, 585, 73, 9, 1, 0]`.
pub const BIN_OFFSETS: [u32; NUM_BIN_LEVELS] = bin_offsets();

const fn bin_offsets() -> [u32; NUM_BIN_LEVELS] {
    let mut offsets = [0u32; NUM_BIN_LEVELS];
    let mut i = NUM_BIN_LEVELS - 1;
    while i > 0 {
        i -= 1;
        offsets[i] = offsets[i + 1] + (1 << ((NUM_BIN_LEVELS - 2 - i) as u32 * BIN_NEXT_SHIFT));
    }
    offsets
}

const _: () = assert!(BIN_OFFSETS[0] as u64 + level_cells(0) == NUM_BINS as u64);

/// Number of cells (and therefore bin ids) at a level.
#[inline]
const fn level_cells(level: usize) -> u64 {
    1 << ((NUM_BIN_LEVELS - 1 - level) as u32 * BIN_NEXT_SHIFT)
}

/// Errors raised while placing an interval in the bin hierarchy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BinIndexError {
    /// The interval does not fit inside the top-level cell of the hierarchy.
    #[error("Interval [{start}, {end}) does not fit in the bin hierarchy (max {max} bp)")]
    BinOverflow { start: u64, end: u64, max: u64 },
    /// The half-open range holds no bases.
    #[error("Empty range [{start}, {end})")]
    EmptyRange { start: u64, end: u64 },
}

///
/// Compute the bin of the half-open range `[start, end_exclusive)`.
///
/// The range lands in the finest level whose cell contains it entirely. A closed
/// interval `[s, e]` is binned with `assign_bin(s, e + 1)`.
///
/// ```
/// use svannot_overlaprs::bin_index::assign_bin;
///
/// assert_eq!(assign_bin(0, 16_384), Ok(4681));
/// assert_eq!(assign_bin(0, 16_385), Ok(585));
/// assert!(assign_bin(0, (1 << 29) + 1).is_err());
/// ```
pub fn assign_bin(start: u64, end_exclusive: u64) -> Result<u32, BinIndexError> {
    if end_exclusive <= start {
        return Err(BinIndexError::EmptyRange {
            start,
            end: end_exclusive,
        });
    }

    let overflow = BinIndexError::BinOverflow {
        start,
        end: end_exclusive,
        max: 1 << (BIN_FIRST_SHIFT + (NUM_BIN_LEVELS as u32 - 1) * BIN_NEXT_SHIFT),
    };

    let mut first = start >> BIN_FIRST_SHIFT;
    let mut last = (end_exclusive - 1) >> BIN_FIRST_SHIFT;
    for (level, offset) in BIN_OFFSETS.iter().enumerate() {
        if first == last {
            if first >= level_cells(level) {
                return Err(overflow);
            }
            return Ok(offset + first as u32);
        }
        first >>= BIN_NEXT_SHIFT;
        last >>= BIN_NEXT_SHIFT;
    }

    Err(overflow)
}

/// Level that a bin id belongs to.
pub fn bin_level(bin: u32) -> Option<usize> {
    if bin >= NUM_BINS {
        return None;
    }
    BIN_OFFSETS.iter().position(|offset| bin >= *offset)
}

/// A hierarchical bin index over the intervals of one chromosome.
///
/// Every interval is stored in exactly one bin: the smallest cell, over six levels of
/// 16Kb, 128Kb, 1Mb, 8Mb, 64Mb and 512Mb cells, that contains it. A query visits the
/// cells it touches on every level, so the candidate set shrinks to a handful of bins
/// instead of the whole chromosome.
///
/// Bins are kept in id order and each bin keeps insertion order, so query results come
/// back in a fixed order: finest level first, ascending bin id, then insertion order.
///
/// # Examples
///
/// ```
/// use svannot_overlaprs::{BinIndex, Overlapper, Interval};
///
/// let features = vec![
///     Interval::new(1000u32, 1199, "AluY").unwrap(),
///     Interval::new(5000, 11000, "L1HS").unwrap(),
///     Interval::new(90_000, 90_300, "SVA_D").unwrap(),
/// ];
///
/// let index = BinIndex::build(features);
///
/// let hits: Vec<&str> = index.find_iter(1100, 6000).map(|iv| *iv.val()).collect();
/// assert_eq!(hits, vec!["AluY", "L1HS"]);
/// ```
#[derive(Debug, Clone)]
pub struct BinIndex<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    bins: BTreeMap<u32, Vec<Interval<I, T>>>,
    len: usize,
    skipped: usize,
}

impl<I, T> Default for BinIndex<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn default() -> Self {
        BinIndex {
            bins: BTreeMap::new(),
            len: 0,
            skipped: 0,
        }
    }
}

impl<I, T> Overlapper<I, T> for BinIndex<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Bulk insert. Intervals that do not fit in the hierarchy are logged and skipped.
    fn build(intervals: Vec<Interval<I, T>>) -> Self
    where
        Self: Sized,
    {
        let mut index = BinIndex::new();
        for interval in intervals {
            if let Err(e) = index.insert(interval) {
                warn!("{e}, skipping interval");
                index.skipped += 1;
            }
        }
        debug!(
            "Built bin index: {} intervals in {} bins, {:?} per level ({} skipped)",
            index.len,
            index.num_bins_used(),
            index.level_counts(),
            index.skipped
        );
        index
    }

    fn find(&self, start: I, end: I) -> Vec<Interval<I, T>> {
        self.find_iter(start, end).cloned().collect()
    }

    fn find_iter<'a>(
        &'a self,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a> {
        Box::new(BinIndex::find_iter(self, start, end))
    }
}

impl<I, T> BinIndex<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Insert one interval and return the bin it was stored in.
    ///
    /// Duplicates are kept side by side. On error the interval is dropped and the index
    /// is left untouched; deciding whether to skip or abort is up to the caller.
    ///
    pub fn insert(&mut self, interval: Interval<I, T>) -> Result<u32, BinIndexError> {
        let bin = match (interval.start().to_u64(), interval.end().to_u64()) {
            (Some(start), Some(end)) if end < u64::MAX => assign_bin(start, end + 1)?,
            _ => {
                return Err(BinIndexError::BinOverflow {
                    start: u64::MAX,
                    end: u64::MAX,
                    max: 1 << (BIN_FIRST_SHIFT + (NUM_BIN_LEVELS as u32 - 1) * BIN_NEXT_SHIFT),
                });
            }
        };
        self.bins.entry(bin).or_default().push(interval);
        self.len += 1;
        Ok(bin)
    }

    ///
    /// Iterate over every stored interval overlapping the closed range `[start, end]`.
    ///
    /// An inverted range (`start > end`) yields nothing.
    ///
    pub fn find_iter(&self, start: I, end: I) -> IterFind<'_, I, T> {
        let (cell_start, cell_end) = match (start.to_u64(), end.to_u64()) {
            (Some(s), Some(e)) if s <= e => (s >> BIN_FIRST_SHIFT, e >> BIN_FIRST_SHIFT),
            // an empty cell range: first > last on every level
            _ => (1, 0),
        };
        IterFind {
            bins: &self.bins,
            start,
            end,
            level: 0,
            cell_start,
            cell_end,
            range: None,
            members: [].iter(),
        }
    }

    /// Every stored interval overlapping `query`, in scan order.
    pub fn query_overlaps<U>(&self, query: &Interval<I, U>) -> Vec<&Interval<I, T>>
    where
        U: Eq + Clone + Send + Sync,
    {
        self.find_iter(query.start(), query.end()).collect()
    }

    /// Number of stored intervals overlapping `[start, end]`.
    pub fn count(&self, start: I, end: I) -> usize {
        self.find_iter(start, end).count()
    }

    /// Number of stored intervals on each level, finest cells first.
    pub fn level_counts(&self) -> [usize; NUM_BIN_LEVELS] {
        let mut counts = [0; NUM_BIN_LEVELS];
        for (bin, members) in &self.bins {
            if let Some(level) = bin_level(*bin) {
                counts[level] += members.len();
            }
        }
        counts
    }

    /// Iterate over all stored intervals in bin order.
    pub fn iter(&self) -> impl Iterator<Item = &Interval<I, T>> {
        self.bins.values().flatten()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-empty bins.
    #[inline]
    pub fn num_bins_used(&self) -> usize {
        self.bins.len()
    }

    /// Number of intervals rejected by [`Overlapper::build`].
    #[inline]
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Iterator over the intervals overlapping a query, created by [`BinIndex::find_iter`].
#[derive(Debug)]
pub struct IterFind<'a, I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    bins: &'a BTreeMap<u32, Vec<Interval<I, T>>>,
    start: I,
    end: I,
    /// next level to open
    level: usize,
    cell_start: u64,
    cell_end: u64,
    range: Option<btree_map::Range<'a, u32, Vec<Interval<I, T>>>>,
    members: std::slice::Iter<'a, Interval<I, T>>,
}

/// Stored bins of one level whose cells fall in `[cell_start, cell_end]`.
fn level_range<'a, I, T>(
    bins: &'a BTreeMap<u32, Vec<Interval<I, T>>>,
    level: usize,
    cell_start: u64,
    cell_end: u64,
) -> Option<btree_map::Range<'a, u32, Vec<Interval<I, T>>>>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    let cells = level_cells(level);
    if cell_start > cell_end || cell_start >= cells {
        return None;
    }
    let lo = BIN_OFFSETS[level] + cell_start as u32;
    let hi = BIN_OFFSETS[level] + cell_end.min(cells - 1) as u32;
    Some(bins.range(lo..=hi))
}

impl<'a, I, T> Iterator for IterFind<'a, I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    type Item = &'a Interval<I, T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // bin membership is necessary but not sufficient, check real coordinates
            for interval in self.members.by_ref() {
                if interval.overlap(self.start, self.end) {
                    return Some(interval);
                }
            }

            if let Some((_, members)) = self.range.as_mut().and_then(|range| range.next()) {
                self.members = members.iter();
                continue;
            }

            if self.level >= NUM_BIN_LEVELS {
                return None;
            }
            self.range = level_range(self.bins, self.level, self.cell_start, self.cell_end);
            self.cell_start >>= BIN_NEXT_SHIFT;
            self.cell_end >>= BIN_NEXT_SHIFT;
            self.level += 1;
        }
    }
}
