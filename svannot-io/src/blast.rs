//! BLAST tabular reports.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use svannot_core::models::{AlignmentSegment, Strand};
use svannot_core::utils::get_dynamic_reader_w_stdin;

use crate::error::{ParseError, Result};
use crate::lines::{DataLines, Fields, hash_comment};

/// The `-outfmt` value the reader expects `blastn` to have been run with.
pub const BLAST_OUTFMT: &str = "6 qaccver saccver qlen slen qstart qend sstart send sstrand pident length mismatch gapopen evalue bitscore";

/// Number of columns in [`BLAST_OUTFMT`].
pub const BLAST_COLUMNS: usize = 15;

///
/// Streaming reader over a BLAST tabular report in [`BLAST_OUTFMT`] layout.
///
/// Each line becomes a normalised [`AlignmentSegment`]: subject coordinates are swapped
/// when reported in reverse so that `sstart <= send`.
///
pub struct BlastReader<R> {
    lines: DataLines<R>,
}

impl<R: BufRead> BlastReader<R> {
    pub fn new(reader: R) -> Self {
        BlastReader {
            lines: DataLines::new(reader, hash_comment),
        }
    }
}

impl BlastReader<BufReader<Box<dyn Read>>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(BlastReader::new(get_dynamic_reader_w_stdin(path.as_ref())?))
    }
}

impl<R: BufRead> Iterator for BlastReader<R> {
    type Item = Result<AlignmentSegment>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line_no, line) = match self.lines.next()? {
            Ok(next) => next,
            Err(e) => return Some(Err(e)),
        };
        Some(parse_blast_line(line_no, &line))
    }
}

///
/// Parse one report line.
///
/// # Arguments
/// - line_no: 1-based line number, used in errors
/// - line: the tab-separated record
pub fn parse_blast_line(line_no: usize, line: &str) -> Result<AlignmentSegment> {
    let f = Fields::split(line_no, line, BLAST_COLUMNS)?;

    let sstrand: Strand = f.parse(8, "sstrand")?;
    let segment = AlignmentSegment {
        query_id: f.get(0).to_string(),
        subject_id: f.get(1).to_string(),
        qlen: f.parse(2, "qlen")?,
        slen: f.parse(3, "slen")?,
        qstart: f.parse(4, "qstart")?,
        qend: f.parse(5, "qend")?,
        sstart: f.parse(6, "sstart")?,
        send: f.parse(7, "send")?,
        sstrand,
        pident: f.parse(9, "pident")?,
        length: f.parse(10, "length")?,
        mismatch: f.parse(11, "mismatch")?,
        gapopen: f.parse(12, "gapopen")?,
        evalue: f.parse(13, "evalue")?,
        bitscore: f.parse(14, "bitscore")?,
    };

    segment.normalized().map_err(|source| ParseError::Segment {
        line: line_no,
        source,
    })
}

///
/// Read a whole report into memory.
///
pub fn read_blast_report<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<AlignmentSegment>> {
    let segments = BlastReader::from_path(path.as_ref())?.collect::<Result<Vec<_>>>()?;
    Ok(segments)
}
