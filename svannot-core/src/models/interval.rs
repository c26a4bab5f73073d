// Ordering and equality follow rust-lapper's Interval:
// https://github.com/sstadick/rust-lapper/blob/7e3904daed85181f1faa39b15f51935f13945976/src/lib.rs#L92
use num_traits::{PrimInt, Unsigned};
use std::cmp::Ordering::{self};

use crate::errors::IntervalError;

/// Represent a closed range [start, end]
/// Both ends are inclusive, so a single base has `start == end`.
#[derive(Eq, Debug, Clone)]
pub struct Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    start: I,
    end: I,
    val: T,
}

impl<I, T> Ord for Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn cmp(&self, other: &Interval<I, T>) -> Ordering {
        match self.start.cmp(&other.start) {
            Ordering::Less => Ordering::Less,
            Ordering::Greater => Ordering::Greater,
            Ordering::Equal => self.end.cmp(&other.end),
        }
    }
}

impl<I, T> Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    ///
    /// Create a new interval, rejecting inverted ranges.
    ///
    /// # Arguments
    /// - start: first base of the interval
    /// - end: last base of the interval (inclusive)
    /// - val: payload carried alongside the coordinates
    ///
    /// ```
    /// use svannot_core::models::Interval;
    ///
    /// let iv = Interval::new(10u32, 19, "feature").unwrap();
    /// assert_eq!(iv.size(), 10);
    /// assert!(Interval::new(20u32, 19, ()).is_err());
    /// ```
    pub fn new(start: I, end: I, val: T) -> Result<Self, IntervalError> {
        if start > end {
            return Err(IntervalError::InvalidInterval {
                start: start.to_u64().unwrap_or(u64::MAX),
                end: end.to_u64().unwrap_or(u64::MAX),
            });
        }
        Ok(Interval { start, end, val })
    }

    #[inline]
    pub fn start(&self) -> I {
        self.start
    }

    #[inline]
    pub fn end(&self) -> I {
        self.end
    }

    #[inline]
    pub fn val(&self) -> &T {
        &self.val
    }

    /// Consume the interval and hand back its payload.
    pub fn into_val(self) -> T {
        self.val
    }

    /// Number of bases covered: `end - start + 1`.
    #[inline]
    pub fn size(&self) -> I {
        self.end - self.start + I::one()
    }

    /// Signed overlap length with another interval. Zero or negative means the
    /// intervals are disjoint.
    #[inline]
    pub fn overlap_len<U>(&self, other: &Interval<I, U>) -> i64
    where
        U: Eq + Clone + Send + Sync,
    {
        let lo = std::cmp::max(self.start, other.start);
        let hi = std::cmp::min(self.end, other.end);
        to_i64(hi) - to_i64(lo) + 1
    }

    /// Check if this interval overlaps the closed range [start, end]
    #[inline]
    pub fn overlap(&self, start: I, end: I) -> bool {
        self.start <= end && self.end >= start
    }
}

#[inline]
fn to_i64<I: PrimInt>(x: I) -> i64 {
    x.to_i64().unwrap_or(i64::MAX)
}

impl<I, T> PartialOrd for Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I, T> PartialEq for Interval<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn eq(&self, other: &Interval<I, T>) -> bool {
        self.start == other.start && self.end == other.end
    }
}
