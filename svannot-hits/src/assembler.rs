//! Grouping of alignment segments into per-query hit lists.

use indexmap::IndexMap;
use log::debug;

use svannot_core::models::AlignmentSegment;

use crate::coverage::CoverageMode;
use crate::hit::Hit;
use crate::selector::select_best_hit_with;

///
/// All hits of one query sequence, one per subject, in the order the subjects were
/// first seen in the alignment report.
///
#[derive(Debug, Clone, PartialEq)]
pub struct QueryHits {
    pub query_id: String,
    pub hits: Vec<Hit>,
}

impl QueryHits {
    pub fn best_hit(&self) -> Option<&Hit> {
        self.best_hit_with(CoverageMode::default())
    }

    pub fn best_hit_with(&self, mode: CoverageMode) -> Option<&Hit> {
        select_best_hit_with(&self.hits, mode)
    }

    pub fn into_hits(self) -> Vec<Hit> {
        self.hits
    }
}

///
/// Group segments by query, then by subject within each query.
///
/// Queries come back in first-seen order and so do subjects within a query. Segments
/// keep their input order inside a hit. Reports written by the aligner list all
/// segments of a pair contiguously; input that does not is still grouped by key.
///
pub fn assemble_query_hits<It>(segments: It) -> Vec<QueryHits>
where
    It: IntoIterator<Item = AlignmentSegment>,
{
    let mut groups: IndexMap<String, IndexMap<String, Vec<AlignmentSegment>>> = IndexMap::new();
    let mut last_pair: Option<(String, String)> = None;
    let mut reopened = 0usize;

    for seg in segments {
        let same_as_last = last_pair
            .as_ref()
            .is_some_and(|(q, s)| *q == seg.query_id && *s == seg.subject_id);

        if !same_as_last {
            let seen = groups
                .get(&seg.query_id)
                .is_some_and(|subjects| subjects.contains_key(&seg.subject_id));
            if seen {
                reopened += 1;
            }
            last_pair = Some((seg.query_id.clone(), seg.subject_id.clone()));
        }

        groups
            .entry(seg.query_id.clone())
            .or_default()
            .entry(seg.subject_id.clone())
            .or_default()
            .push(seg);
    }

    if reopened > 0 {
        debug!("{reopened} query/subject pairs were not contiguous in the alignment input");
    }

    groups
        .into_iter()
        .map(|(query_id, subjects)| QueryHits {
            hits: subjects
                .into_iter()
                .map(|(subject_id, segs)| Hit::from_parts(query_id.clone(), subject_id, segs))
                .collect(),
            query_id,
        })
        .collect()
}

/// Group segments into hits, flattened across queries but in the same order as
/// [`assemble_query_hits`].
pub fn assemble_hits<It>(segments: It) -> Vec<Hit>
where
    It: IntoIterator<Item = AlignmentSegment>,
{
    assemble_query_hits(segments)
        .into_iter()
        .flat_map(QueryHits::into_hits)
        .collect()
}
