//! # Input/Output for svannot.
//!
//! Streaming readers for the files an annotation run consumes (BED, RepeatMasker tables,
//! BLAST tabular reports, SV VCFs) and the writers for the reports it produces. Every
//! reader is an iterator of `Result` records so a malformed line surfaces with its line
//! number instead of aborting the whole file silently. Gzipped input is detected from
//! the `.gz` extension.
//!
pub mod bed;
pub mod blast;
pub mod error;
pub mod report;
pub mod rmsk;
pub mod vcf;

mod lines;

// re-expose core functions
pub use bed::*;
pub use blast::*;
pub use error::*;
pub use report::*;
pub use rmsk::*;
pub use vcf::*;
