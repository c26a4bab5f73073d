//! Assembly of pairwise alignment segments (HSPs) into hits, and best-hit selection.
//!
//! An inserted sequence aligned against a database of mobile elements and viral genomes
//! usually comes back as several fragments per target. This crate groups those fragments
//! per `(query, subject)` pair, measures how much of each sequence they cover once the
//! overlap between fragments is removed, and picks the target with the best combined
//! coverage.
//!
//! ```rust
//! use svannot_core::models::{AlignmentSegment, Strand};
//! use svannot_hits::{assemble_query_hits, select_best_hit};
//!
//! let seg = |subject: &str, qstart: u64, qend: u64| AlignmentSegment {
//!     query_id: "ins1".to_string(),
//!     subject_id: subject.to_string(),
//!     qlen: 200, slen: 200,
//!     qstart, qend, sstart: qstart, send: qend,
//!     sstrand: Strand::Plus,
//!     pident: 99.0, length: qend - qstart + 1,
//!     mismatch: 0, gapopen: 0, evalue: 0.0, bitscore: 100.0,
//! };
//!
//! let groups = assemble_query_hits(vec![seg("AluY", 1, 100), seg("L1HS", 1, 190)]);
//! let best = select_best_hit(&groups[0].hits).unwrap();
//! assert_eq!(best.subject_id(), "L1HS");
//! ```
pub mod assembler;
pub mod coverage;
pub mod hit;
pub mod selector;

pub use assembler::{assemble_hits, assemble_query_hits, QueryHits};
pub use coverage::CoverageMode;
pub use hit::{Hit, HitError, InsAnnotation};
pub use selector::{best_hits_par, select_best_hit, select_best_hit_with};
