//! Interval indexing and overlap matching for structural-variant annotation.
//!
//! This crate holds the part of svannot that answers "which reference features overlap
//! this SV, and does any of them match it?". It provides a hierarchical bin index over
//! one chromosome, a genome-wide map of those indices, and the reciprocal-overlap rules
//! used to decide a mobile-element match.
//!
//! ## Quick Start
//!
//! ```rust
//! use svannot_overlaprs::{BinIndex, Overlapper, Interval};
//!
//! // repeat annotations on one chromosome
//! let repeats = vec![
//!     Interval::new(100u32, 400, "AluSx").unwrap(),
//!     Interval::new(350, 6_400, "L1PA3").unwrap(),
//!     Interval::new(9_000, 9_300, "AluY").unwrap(),
//! ];
//!
//! let index = BinIndex::build(repeats);
//!
//! let overlaps = index.find(380, 500);
//! assert_eq!(overlaps.len(), 2);
//!
//! for interval in index.find_iter(380, 500) {
//!     println!("Found overlap: {:?}", interval);
//! }
//! ```
//!
//! ## Matching
//!
//! [`policy::match_feature`] filters overlap candidates with [`policy::MatchPolicy`]:
//! at least 50% reciprocal overlap plus class-specific breakpoint tolerances.

/// Hierarchical bin index.
///
/// See [`BinIndex`] for details.
pub mod bin_index;

/// Genome-wide interval indexing.
///
/// See [`multi_chrom_overlapper::MultiChromBinIndex`].
pub mod multi_chrom_overlapper;

/// Reciprocal-overlap and mobile-element match rules.
pub mod policy;

/// Core traits for overlap operations.
///
/// See [`Overlapper`] for the main trait.
pub mod traits;

// re-exports
pub use self::bin_index::{BinIndex, BinIndexError};
pub use self::multi_chrom_overlapper::{IntoMultiChromBinIndex, MultiChromBinIndex};
pub use self::policy::{match_feature, reciprocal_overlap, FeatureClass, MatchPolicy, MeiClass};
pub use self::traits::{Interval, Overlapper};

/// Constants used throughout the crate.
pub mod consts {
    /// The command name for overlap operations.
    pub const OVERLAP_CMD: &str = "overlap";
}
