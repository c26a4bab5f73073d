//! # Core models for svannot
//!
//! Closed genomic intervals, BED-like regions and pairwise alignment segments shared by
//! the index, hit assembly and io crates, plus small reader utilities.
//!
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::*;
