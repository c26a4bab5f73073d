use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::SegmentError;

/// Strand of the subject sequence reported for an alignment segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Plus,
    Minus,
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plus" | "+" => Ok(Strand::Plus),
            "minus" | "-" => Ok(Strand::Minus),
            _ => Err(format!("Unknown strand: {}", s)),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Plus => write!(f, "plus"),
            Strand::Minus => write!(f, "minus"),
        }
    }
}

///
/// One pairwise local alignment (an HSP) between a query and a subject sequence.
///
/// Coordinates are 1-based and closed. Subject coordinates are always stored with
/// `sstart <= send`; the orientation lives in `sstrand`.
///
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentSegment {
    pub query_id: String,
    pub subject_id: String,
    pub qlen: u64,
    pub slen: u64,
    pub qstart: u64,
    pub qend: u64,
    pub sstart: u64,
    pub send: u64,
    pub sstrand: Strand,
    pub pident: f64,
    pub length: u64,
    pub mismatch: u64,
    pub gapopen: u64,
    pub evalue: f64,
    pub bitscore: f64,
}

impl AlignmentSegment {
    ///
    /// Check the segment and flip a reversed subject span so that `sstart <= send`.
    ///
    /// A reversed subject span on a segment reported as `plus` is flipped to `minus`.
    ///
    pub fn normalized(mut self) -> Result<Self, SegmentError> {
        if self.qstart == 0 || self.sstart == 0 || self.send == 0 {
            return Err(SegmentError::ZeroCoordinate {
                query: self.query_id,
                subject: self.subject_id,
            });
        }
        if self.qstart > self.qend {
            return Err(SegmentError::InvertedQuerySpan {
                query: self.query_id,
                subject: self.subject_id,
                qstart: self.qstart,
                qend: self.qend,
            });
        }
        if self.send < self.sstart {
            std::mem::swap(&mut self.sstart, &mut self.send);
            self.sstrand = Strand::Minus;
        }
        Ok(self)
    }
}
