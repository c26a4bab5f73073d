//! Structural-variant records from a VCF.
//!
//! Only the columns the annotation needs are read: `CHROM`, `POS`, `ID` and the INFO
//! keys `SVTYPE`, `END`, `CHR2` and `SVLEN`. Header lines are skipped.

use std::fmt::{self, Display};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use svannot_core::models::Interval;
use svannot_core::utils::{get_dynamic_reader_w_stdin, with_chr_prefix};

use crate::error::{ParseError, Result};
use crate::lines::{DataLines, Fields, hash_comment};

/// Mandatory VCF columns up to and including INFO.
const VCF_COLUMNS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SvType {
    Del,
    Ins,
    Dup,
    Inv,
    Bnd,
    Other(String),
}

impl From<&str> for SvType {
    fn from(s: &str) -> Self {
        match s {
            "DEL" => SvType::Del,
            "INS" => SvType::Ins,
            "DUP" => SvType::Dup,
            "INV" => SvType::Inv,
            "BND" | "TRA" => SvType::Bnd,
            other => SvType::Other(other.to_string()),
        }
    }
}

impl Display for SvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvType::Del => write!(f, "DEL"),
            SvType::Ins => write!(f, "INS"),
            SvType::Dup => write!(f, "DUP"),
            SvType::Inv => write!(f, "INV"),
            SvType::Bnd => write!(f, "BND"),
            SvType::Other(s) => write!(f, "{}", s),
        }
    }
}

///
/// Length window for deletions sent to repeat matching: `min_len < |svlen| < max_len`.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelFilter {
    pub min_len: u64,
    pub max_len: u64,
}

impl Default for DelFilter {
    fn default() -> Self {
        DelFilter {
            min_len: 100,
            max_len: 11_000,
        }
    }
}

impl DelFilter {
    pub fn accepts(&self, svlen: i64) -> bool {
        let len = svlen.unsigned_abs();
        len > self.min_len && len < self.max_len
    }
}

///
/// One SV call. `pos2` comes from `END` (or `POS` when absent), `chrom2` from `CHR2`
/// (or `CHROM`).
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvRecord {
    pub chrom1: String,
    pub pos1: u32,
    pub chrom2: String,
    pub pos2: u32,
    pub svtype: SvType,
    pub id: String,
    pub svlen: Option<i64>,
}

impl SvRecord {
    ///
    /// Parse a VCF data line.
    ///
    /// # Arguments
    /// - line_no: 1-based line number, used in errors
    /// - line: the tab-separated record
    pub fn from_vcf_line(line_no: usize, line: &str) -> Result<Self> {
        let f = Fields::split(line_no, line, VCF_COLUMNS)?;
        let chrom1 = f.get(0).to_string();
        let pos1: u32 = f.parse(1, "POS")?;
        let id = f.get(2).to_string();

        let mut svtype = None;
        let mut end = None;
        let mut chr2 = None;
        let mut svlen = None;
        for entry in f.get(7).split(';') {
            let Some((key, value)) = entry.split_once('=') else {
                continue;
            };
            match key {
                "SVTYPE" => svtype = Some(value),
                "END" => end = Some(parse_info(line_no, "END", value)?),
                "CHR2" => chr2 = Some(value),
                "SVLEN" => svlen = Some(parse_info(line_no, "SVLEN", value)?),
                _ => {}
            }
        }

        let svtype = svtype.ok_or(ParseError::MissingInfo {
            line: line_no,
            key: "SVTYPE",
        })?;

        Ok(SvRecord {
            chrom2: chr2.map_or_else(|| chrom1.clone(), str::to_string),
            chrom1,
            pos1,
            pos2: end.unwrap_or(pos1),
            svtype: SvType::from(svtype),
            id,
            svlen,
        })
    }

    ///
    /// The deletion as a `(chromosome, interval)` query for repeat matching, or `None`
    /// when the record is not a deletion, has no `SVLEN`, or falls outside `filter`.
    ///
    /// The chromosome gets a `chr` prefix when it lacks one. The interval spans
    /// `[pos1, pos2]` and carries the SV id.
    ///
    pub fn deletion_query(&self, filter: &DelFilter) -> Result<Option<(String, Interval<u32, String>)>> {
        if self.svtype != SvType::Del {
            return Ok(None);
        }
        let Some(svlen) = self.svlen else {
            return Ok(None);
        };
        if !filter.accepts(svlen) {
            return Ok(None);
        }
        if self.pos1 > self.pos2 {
            return Err(ParseError::InvertedDeletion {
                id: self.id.clone(),
                pos1: self.pos1,
                pos2: self.pos2,
            });
        }
        let interval = Interval::new(self.pos1, self.pos2, self.id.clone()).map_err(|_| {
            ParseError::InvertedDeletion {
                id: self.id.clone(),
                pos1: self.pos1,
                pos2: self.pos2,
            }
        })?;
        Ok(Some((with_chr_prefix(&self.chrom1), interval)))
    }
}

fn parse_info<T: FromStr>(line: usize, column: &'static str, value: &str) -> Result<T> {
    value.parse().map_err(|_| ParseError::InvalidField {
        line,
        column,
        value: value.to_string(),
    })
}

pub struct VcfReader<R> {
    lines: DataLines<R>,
}

impl<R: BufRead> VcfReader<R> {
    pub fn new(reader: R) -> Self {
        VcfReader {
            lines: DataLines::new(reader, hash_comment),
        }
    }
}

impl VcfReader<BufReader<Box<dyn Read>>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(VcfReader::new(get_dynamic_reader_w_stdin(path.as_ref())?))
    }
}

impl<R: BufRead> Iterator for VcfReader<R> {
    type Item = Result<SvRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line_no, line) = match self.lines.next()? {
            Ok(next) => next,
            Err(e) => return Some(Err(e)),
        };
        Some(SvRecord::from_vcf_line(line_no, &line))
    }
}

///
/// Read every SV record of a VCF into memory.
///
pub fn read_sv_vcf<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<SvRecord>> {
    let records = VcfReader::from_path(path.as_ref())?.collect::<Result<Vec<_>>>()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn line(chrom: &str, pos: u32, id: &str, info: &str) -> String {
        format!("{chrom}\t{pos}\t{id}\tN\t<DEL>\t.\tPASS\t{info}\tGT\t0/1")
    }

    #[rstest]
    fn test_parse_deletion() {
        let sv = SvRecord::from_vcf_line(
            1,
            &line("1", 1005, "del_3", "PRECISE;SVTYPE=DEL;SVLEN=-190;END=1195;CHR2=1"),
        )
        .unwrap();
        assert_eq!(
            sv,
            SvRecord {
                chrom1: "1".to_string(),
                pos1: 1005,
                chrom2: "1".to_string(),
                pos2: 1195,
                svtype: SvType::Del,
                id: "del_3".to_string(),
                svlen: Some(-190),
            }
        );
    }

    #[rstest]
    fn test_defaults_without_end_and_chr2() {
        let sv = SvRecord::from_vcf_line(1, &line("chr2", 500, "ins_1", "SVTYPE=INS;SVLEN=320")).unwrap();
        assert_eq!(sv.pos2, 500);
        assert_eq!(sv.chrom2, "chr2");
        assert_eq!(sv.svtype, SvType::Ins);
        assert_eq!(sv.svtype.to_string(), "INS");
    }

    #[rstest]
    fn test_missing_svtype() {
        let err = SvRecord::from_vcf_line(4, &line("1", 5, "x", "SVLEN=10")).unwrap_err();
        assert!(matches!(err, ParseError::MissingInfo { line: 4, key: "SVTYPE" }));
    }

    #[rstest]
    fn test_bad_end() {
        let err = SvRecord::from_vcf_line(2, &line("1", 5, "x", "SVTYPE=DEL;END=far")).unwrap_err();
        assert!(matches!(err, ParseError::InvalidField { line: 2, column: "END", .. }));
    }

    #[rstest]
    #[case(-100, false)]
    #[case(-101, true)]
    #[case(10_999, true)]
    #[case(11_000, false)]
    fn test_del_filter_bounds(#[case] svlen: i64, #[case] expected: bool) {
        assert_eq!(DelFilter::default().accepts(svlen), expected);
    }

    #[rstest]
    fn test_deletion_query_adds_chr_prefix() {
        let sv = SvRecord::from_vcf_line(1, &line("1", 1005, "d1", "SVTYPE=DEL;SVLEN=-190;END=1195")).unwrap();
        let (chrom, interval) = sv.deletion_query(&DelFilter::default()).unwrap().unwrap();
        assert_eq!(chrom, "chr1");
        assert_eq!((interval.start(), interval.end()), (1005, 1195));
        assert_eq!(interval.val(), "d1");
    }

    #[rstest]
    #[case("SVTYPE=INS;SVLEN=190")]
    #[case("SVTYPE=DEL")]
    #[case("SVTYPE=DEL;SVLEN=-50;END=1055")]
    fn test_deletion_query_skips(#[case] info: &str) {
        let sv = SvRecord::from_vcf_line(1, &line("chr1", 1005, "d1", info)).unwrap();
        assert_eq!(sv.deletion_query(&DelFilter::default()).unwrap(), None);
    }

    #[rstest]
    fn test_deletion_query_rejects_inverted() {
        let sv = SvRecord::from_vcf_line(1, &line("chr1", 5000, "bad", "SVTYPE=DEL;SVLEN=-400;END=4600")).unwrap();
        assert!(matches!(
            sv.deletion_query(&DelFilter::default()),
            Err(ParseError::InvertedDeletion { pos1: 5000, pos2: 4600, .. })
        ));
    }

    #[rstest]
    fn test_reader_skips_header() {
        let data = format!(
            "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n{}\n",
            line("1", 10, "a", "SVTYPE=DEL;SVLEN=-300;END=310")
        );
        let records: Vec<SvRecord> = VcfReader::new(data.as_bytes()).collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "a");
    }

    #[rstest]
    fn test_from_path_accepts_stdin() {
        assert!(VcfReader::from_path(svannot_core::utils::STDIN_PATH).is_ok());
        assert!(VcfReader::from_path("no/such/calls.vcf").is_err());
    }
}
