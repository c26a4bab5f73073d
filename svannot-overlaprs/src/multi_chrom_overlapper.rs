//! Genome-wide interval indexing for multi-chromosome overlap queries.
//!
//! This module provides [`MultiChromBinIndex`](crate::multi_chrom_overlapper::MultiChromBinIndex),
//! which keeps one [`BinIndex`](crate::BinIndex) per chromosome. It is owned by a single
//! annotation run: built once from the reference features, queried, then dropped.
//!
//! # Examples
//!
//! ```
//! use svannot_overlaprs::multi_chrom_overlapper::MultiChromBinIndex;
//! use svannot_core::models::Interval;
//!
//! let mut index = MultiChromBinIndex::new();
//! index.insert("chr1", Interval::new(1000u32, 2000, "AluY").unwrap()).unwrap();
//! index.insert("chr2", Interval::new(1000u32, 3000, "L1HS").unwrap()).unwrap();
//!
//! let query = Interval::new(1500u32, 2500, ()).unwrap();
//! assert_eq!(index.find_overlaps("chr1", &query).len(), 1);
//! assert!(index.find_overlaps("chr3", &query).is_empty());
//! ```

use std::collections::HashMap;

use log::{debug, warn};
use num_traits::{PrimInt, Unsigned};
use rayon::prelude::*;

use svannot_core::models::{Interval, Region};

use crate::bin_index::{BinIndex, BinIndexError};

/// A genome-wide index: one [`BinIndex`] per chromosome.
///
/// Chromosomes are independent, so the per-chromosome indices can be shared across
/// threads once building is done (see [`MultiChromBinIndex::par_find_overlaps`]).
#[derive(Debug, Clone)]
pub struct MultiChromBinIndex<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    index_maps: HashMap<String, BinIndex<I, T>>,
}

impl<I, T> Default for MultiChromBinIndex<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn default() -> Self {
        MultiChromBinIndex {
            index_maps: HashMap::default(),
        }
    }
}

impl<I, T> MultiChromBinIndex<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Insert a feature on a chromosome, creating that chromosome's index on first use.
    ///
    pub fn insert(&mut self, chr: &str, interval: Interval<I, T>) -> Result<u32, BinIndexError> {
        match self.index_maps.get_mut(chr) {
            Some(index) => index.insert(interval),
            None => {
                let mut index = BinIndex::new();
                let bin = index.insert(interval)?;
                self.index_maps.insert(chr.to_string(), index);
                Ok(bin)
            }
        }
    }

    ///
    /// Build an index from `(chromosome, interval)` pairs.
    ///
    /// Features that do not fit in the bin hierarchy are logged and skipped.
    ///
    pub fn build<S, It>(features: It) -> Self
    where
        S: AsRef<str>,
        It: IntoIterator<Item = (S, Interval<I, T>)>,
    {
        let mut index = Self::new();
        let mut skipped = 0usize;
        for (chr, interval) in features {
            if let Err(e) = index.insert(chr.as_ref(), interval) {
                warn!("{e} on {}, skipping feature", chr.as_ref());
                skipped += 1;
            }
        }
        debug!(
            "Indexed {} features on {} chromosomes ({} skipped)",
            index.len(),
            index.index_maps.len(),
            skipped
        );
        index
    }

    /// The index of one chromosome, if it holds any feature.
    pub fn get(&self, chr: &str) -> Option<&BinIndex<I, T>> {
        self.index_maps.get(chr)
    }

    ///
    /// Every feature on `chr` overlapping `query`, in index scan order.
    ///
    /// An unknown chromosome yields an empty vector.
    ///
    pub fn find_overlaps<U>(&self, chr: &str, query: &Interval<I, U>) -> Vec<&Interval<I, T>>
    where
        U: Eq + Clone + Send + Sync,
    {
        match self.index_maps.get(chr) {
            Some(index) => index.query_overlaps(query),
            None => Vec::new(),
        }
    }

    ///
    /// Query a batch of `(chromosome, interval)` pairs in parallel. Results come back in
    /// the order of `queries`.
    ///
    pub fn par_find_overlaps<'a, U>(
        &'a self,
        queries: &[(String, Interval<I, U>)],
    ) -> Vec<Vec<&'a Interval<I, T>>>
    where
        U: Eq + Clone + Send + Sync,
    {
        queries
            .par_iter()
            .map(|(chr, query)| self.find_overlaps(chr, query))
            .collect()
    }

    /// Chromosome names, sorted.
    pub fn chromosomes(&self) -> Vec<&str> {
        let mut chrs: Vec<&str> = self.index_maps.keys().map(String::as_str).collect();
        chrs.sort_unstable();
        chrs
    }

    /// Total number of indexed features.
    pub fn len(&self) -> usize {
        self.index_maps.values().map(BinIndex::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A trait for converting region-based data into a [`MultiChromBinIndex`].
pub trait IntoMultiChromBinIndex<I, T>
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn into_multi_chrom_bin_index(self) -> MultiChromBinIndex<I, T>;
}

impl IntoMultiChromBinIndex<u32, Option<String>> for Vec<Region> {
    fn into_multi_chrom_bin_index(self) -> MultiChromBinIndex<u32, Option<String>> {
        let features = self.into_iter().filter_map(|region| match region.to_interval() {
            Ok(interval) => Some((region.chr, interval)),
            Err(e) => {
                warn!("{e} on {}, skipping region", region.chr);
                None
            }
        });
        MultiChromBinIndex::build(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn region(chr: &str, start: u32, end: u32, rest: Option<&str>) -> Region {
        Region {
            chr: chr.to_string(),
            start,
            end,
            rest: rest.map(str::to_string),
        }
    }

    fn query(start: u32, end: u32) -> Interval<u32, ()> {
        Interval::new(start, end, ()).unwrap()
    }

    #[fixture]
    fn index() -> MultiChromBinIndex<u32, Option<String>> {
        vec![
            region("chr1", 100, 200, Some("gene_a")),
            region("chr1", 300, 400, Some("gene_b")),
            region("chr1", 600, 800, None),
            region("chr2", 300, 400, None),
            region("chr3", 500, 600, None),
        ]
        .into_multi_chrom_bin_index()
    }

    #[rstest]
    fn test_basic_overlaps(index: MultiChromBinIndex<u32, Option<String>>) {
        let hits = index.find_overlaps("chr1", &query(110, 210));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].start(), 100);
        assert_eq!(hits[0].end(), 200);
        assert_eq!(hits[0].val().as_deref(), Some("gene_a"));
    }

    #[rstest]
    fn test_multiple_chromosomes(index: MultiChromBinIndex<u32, Option<String>>) {
        assert_eq!(index.chromosomes(), vec!["chr1", "chr2", "chr3"]);
        assert_eq!(index.len(), 5);
        assert_eq!(index.find_overlaps("chr2", &query(350, 450)).len(), 1);
        assert_eq!(index.find_overlaps("chr3", &query(350, 450)).len(), 0);
    }

    #[rstest]
    fn test_query_nonexistent_chromosome(index: MultiChromBinIndex<u32, Option<String>>) {
        assert_eq!(index.find_overlaps("chr99", &query(100, 200)).is_empty(), true);
        assert_eq!(index.get("chr99").is_none(), true);
    }

    #[rstest]
    fn test_exact_boundary_overlaps(index: MultiChromBinIndex<u32, Option<String>>) {
        // closed coordinates: touching the last base counts
        assert_eq!(index.find_overlaps("chr1", &query(200, 250)).len(), 1);
        assert_eq!(index.find_overlaps("chr1", &query(201, 250)).len(), 0);
    }

    #[rstest]
    fn test_par_find_overlaps_keeps_order(index: MultiChromBinIndex<u32, Option<String>>) {
        let queries = vec![
            ("chr3".to_string(), query(550, 560)),
            ("chr1".to_string(), query(150, 350)),
            ("chrUn".to_string(), query(1, 10)),
        ];
        let hits = index.par_find_overlaps(&queries);
        let counts: Vec<usize> = hits.iter().map(Vec::len).collect();
        assert_eq!(counts, vec![1, 2, 0]);
    }

    #[rstest]
    fn test_inverted_region_is_skipped() {
        let index = vec![region("chr1", 500, 100, None), region("chr1", 1, 2, None)]
            .into_multi_chrom_bin_index();
        assert_eq!(index.len(), 1);
    }

    #[rstest]
    fn test_insert_creates_chromosome() {
        let mut index: MultiChromBinIndex<u32, &str> = MultiChromBinIndex::new();
        assert_eq!(index.is_empty(), true);
        assert_eq!(index.insert("chrX", Interval::new(1, 5, "x").unwrap()), Ok(4681));
        assert_eq!(index.get("chrX").map(BinIndex::len), Some(1));
    }
}
