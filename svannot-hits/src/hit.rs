use std::fmt::{self, Display};

use thiserror::Error;

use svannot_core::errors::SegmentError;
use svannot_core::models::AlignmentSegment;
use svannot_core::utils::id_prefix;

use crate::coverage::{CoverageMode, merged_length};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HitError {
    #[error("A hit needs at least one alignment segment")]
    EmptyHit,
    #[error(
        "Segment {query}/{subject} does not belong to hit {expected_query}/{expected_subject}"
    )]
    MixedPair {
        query: String,
        subject: String,
        expected_query: String,
        expected_subject: String,
    },
    #[error(transparent)]
    Segment(#[from] SegmentError),
}

///
/// All alignment segments between one query and one subject sequence.
///
/// Coverage and identity are computed from the segments on every call.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    query_id: String,
    subject_id: String,
    segments: Vec<AlignmentSegment>,
}

impl Hit {
    ///
    /// Create a hit from segments that all share the same query and subject ids.
    ///
    /// Each segment is normalized on the way in: reversed subject spans are flipped, and
    /// an inverted or zero-based query span is an error.
    ///
    pub fn new(segments: Vec<AlignmentSegment>) -> Result<Self, HitError> {
        let first = segments.first().ok_or(HitError::EmptyHit)?;
        let (query_id, subject_id) = (first.query_id.clone(), first.subject_id.clone());

        if let Some(stray) = segments
            .iter()
            .find(|s| s.query_id != query_id || s.subject_id != subject_id)
        {
            return Err(HitError::MixedPair {
                query: stray.query_id.clone(),
                subject: stray.subject_id.clone(),
                expected_query: query_id,
                expected_subject: subject_id,
            });
        }

        let segments = segments
            .into_iter()
            .map(AlignmentSegment::normalized)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Hit::from_parts(query_id, subject_id, segments))
    }

    /// Build without checking; the assembler groups by id before calling this.
    pub(crate) fn from_parts(
        query_id: String,
        subject_id: String,
        segments: Vec<AlignmentSegment>,
    ) -> Self {
        Hit {
            query_id,
            subject_id,
            segments,
        }
    }

    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn segments(&self) -> &[AlignmentSegment] {
        &self.segments
    }

    /// Length of the query sequence, as reported by the first segment.
    pub fn query_len(&self) -> u64 {
        self.segments.first().map_or(0, |s| s.qlen)
    }

    /// Length of the subject sequence, as reported by the first segment.
    pub fn subject_len(&self) -> u64 {
        self.segments.first().map_or(0, |s| s.slen)
    }

    /// The subject id up to its first `.`, e.g. `HERVK` for `HERVK.3`.
    pub fn target_type(&self) -> &str {
        id_prefix(&self.subject_id)
    }

    /// Unweighted mean of the segments' percent identity.
    pub fn mean_identity(&self) -> f64 {
        if self.segments.is_empty() {
            return 0.0;
        }
        self.segments.iter().map(|s| s.pident).sum::<f64>() / self.segments.len() as f64
    }

    /// Query bases covered by the segments, after merging overlapping fragments.
    pub fn query_covered(&self, mode: CoverageMode) -> u64 {
        let mut spans: Vec<(u64, u64)> = self.segments.iter().map(|s| (s.qstart, s.qend)).collect();
        merged_length(&mut spans, mode)
    }

    /// Subject bases covered by the segments, after merging overlapping fragments.
    ///
    /// Spans are laid out in query order first, so segments sharing a subject start are
    /// merged in query order rather than in report order.
    pub fn subject_covered(&self, mode: CoverageMode) -> u64 {
        let mut by_query: Vec<&AlignmentSegment> = self.segments.iter().collect();
        by_query.sort_by_key(|s| s.qstart);

        let mut spans: Vec<(u64, u64)> = by_query.iter().map(|s| (s.sstart, s.send)).collect();
        merged_length(&mut spans, mode)
    }

    pub fn query_coverage(&self) -> f64 {
        self.query_coverage_with(CoverageMode::default())
    }

    pub fn subject_coverage(&self) -> f64 {
        self.subject_coverage_with(CoverageMode::default())
    }

    pub fn query_coverage_with(&self, mode: CoverageMode) -> f64 {
        fraction(self.query_covered(mode), self.query_len())
    }

    pub fn subject_coverage_with(&self, mode: CoverageMode) -> f64 {
        fraction(self.subject_covered(mode), self.subject_len())
    }

    /// `query_coverage × subject_coverage`, the ranking score of a hit.
    pub fn score(&self) -> f64 {
        self.score_with(CoverageMode::default())
    }

    pub fn score_with(&self, mode: CoverageMode) -> f64 {
        self.query_coverage_with(mode) * self.subject_coverage_with(mode)
    }

    /// Summarise the hit as one row of the insertion annotation table.
    pub fn annotation(&self, mode: CoverageMode) -> InsAnnotation {
        InsAnnotation {
            id: self.query_id.clone(),
            target: self.subject_id.clone(),
            target_type: self.target_type().to_string(),
            query_length: self.query_len(),
            target_length: self.subject_len(),
            query_cov: self.query_coverage_with(mode),
            target_cov: self.subject_coverage_with(mode),
            mean_identity: self.mean_identity(),
        }
    }
}

#[inline]
fn fraction(covered: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    covered as f64 / total as f64
}

///
/// One row of the insertion annotation table.
///
#[derive(Debug, Clone, PartialEq)]
pub struct InsAnnotation {
    pub id: String,
    pub target: String,
    pub target_type: String,
    pub query_length: u64,
    pub target_length: u64,
    pub query_cov: f64,
    pub target_cov: f64,
    pub mean_identity: f64,
}

impl InsAnnotation {
    pub const HEADER: &'static str = "#id\ttarget\ttarget_type\tquery_length\ttarget_length\tquery_cov\ttarget_cov\tmean_identity";
}

impl Display for InsAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.id,
            self.target,
            self.target_type,
            self.query_length,
            self.target_length,
            self.query_cov,
            self.target_cov,
            self.mean_identity
        )
    }
}
