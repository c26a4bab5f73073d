//! RepeatMasker annotation tables.
//!
//! Two layouts are accepted: the 17-column UCSC `rmsk.txt` dump, and the same table with
//! an extra leading record id column (`rmsk_0`, `rmsk_1`, ...) and a `#` header line.
//! Records from the plain dump get the same `rmsk_<n>` ids, numbered in file order.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use svannot_core::errors::IntervalError;
use svannot_core::models::Interval;
use svannot_core::utils::get_dynamic_reader;
use svannot_overlaprs::{FeatureClass, MeiClass};

use crate::error::{ParseError, Result};
use crate::lines::{DataLines, Fields, hash_comment};

/// Columns of the UCSC dump, `bin` through `id`.
pub const RMSK_COLUMNS: usize = 17;

///
/// One repeat annotation.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RmskRecord {
    pub id: String,
    pub chrom: String,
    pub start: u32,
    pub end: u32,
    pub strand: String,
    pub rep_name: String,
    pub rep_class: String,
    pub rep_family: String,
}

impl RmskRecord {
    /// Closed interval over the repeat, tagged with its mobile-element class.
    pub fn to_interval(&self) -> std::result::Result<Interval<u32, MeiClass>, IntervalError> {
        Interval::new(self.start, self.end, self.mei_class())
    }
}

impl FeatureClass for RmskRecord {
    fn mei_class(&self) -> MeiClass {
        MeiClass::from_rep_name(&self.rep_name)
    }
}

pub struct RmskReader<R> {
    lines: DataLines<R>,
    n: usize,
}

impl<R: BufRead> RmskReader<R> {
    pub fn new(reader: R) -> Self {
        RmskReader {
            lines: DataLines::new(reader, hash_comment),
            n: 0,
        }
    }
}

impl RmskReader<BufReader<Box<dyn Read>>> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(RmskReader::new(get_dynamic_reader(path.as_ref())?))
    }
}

impl<R: BufRead> Iterator for RmskReader<R> {
    type Item = Result<RmskRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line_no, line) = match self.lines.next()? {
            Ok(next) => next,
            Err(e) => return Some(Err(e)),
        };
        let record = parse_rmsk_line(line_no, &line, self.n);
        self.n += 1;
        Some(record)
    }
}

fn parse_rmsk_line(line_no: usize, line: &str, n: usize) -> Result<RmskRecord> {
    let fields = Fields::split(line_no, line, RMSK_COLUMNS)?;
    let (id, o) = if fields.len() > RMSK_COLUMNS {
        (fields.get(0).to_string(), 1)
    } else {
        (format!("rmsk_{}", n), 0)
    };

    let start: u32 = fields.parse(o + 6, "genoStart")?;
    let end: u32 = fields.parse(o + 7, "genoEnd")?;
    if start > end {
        return Err(ParseError::InvertedInterval {
            line: line_no,
            start: start as u64,
            end: end as u64,
        });
    }

    Ok(RmskRecord {
        id,
        chrom: fields.get(o + 5).to_string(),
        start,
        end,
        strand: fields.get(o + 9).to_string(),
        rep_name: fields.get(o + 10).to_string(),
        rep_class: fields.get(o + 11).to_string(),
        rep_family: fields.get(o + 12).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const UCSC_LINE: &str = "585\t1892\t83\t59\t14\tchr1\t67108753\t67109046\t-181847376\t+\tL1P5\tLINE\tL1\t5301\t5607\t-544\t1";
    const ALU_LINE: &str = "585\t2215\t71\t0\t7\tchr1\t1000\t1199\t-248955223\t-\tAluY\tSINE\tAlu\t-3\t308\t1\t2";

    #[rstest]
    fn test_ucsc_layout_gets_generated_ids() {
        let data = format!("#bin\tswScore\n{}\n{}\n", UCSC_LINE, ALU_LINE);
        let records: Vec<RmskRecord> = RmskReader::new(data.as_bytes())
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "rmsk_0");
        assert_eq!(records[1].id, "rmsk_1");
        assert_eq!(records[0].chrom, "chr1");
        assert_eq!(records[0].start, 67108753);
        assert_eq!(records[0].end, 67109046);
        assert_eq!(records[0].rep_name, "L1P5");
        assert_eq!(records[0].rep_family, "L1");
        assert_eq!(records[1].strand, "-");
    }

    #[rstest]
    fn test_formatted_layout_keeps_ids() {
        let data = format!("#rmsk_id\tbin\n{}\t{}\n", "rmsk_41", ALU_LINE);
        let record = RmskReader::new(data.as_bytes()).next().unwrap().unwrap();
        assert_eq!(record.id, "rmsk_41");
        assert_eq!(record.rep_name, "AluY");
        assert_eq!(record.rep_class, "SINE");
    }

    #[rstest]
    #[case(UCSC_LINE, MeiClass::L1)]
    #[case(ALU_LINE, MeiClass::Alu)]
    fn test_mei_class(#[case] line: &str, #[case] expected: MeiClass) {
        let record = RmskReader::new(line.as_bytes()).next().unwrap().unwrap();
        assert_eq!(record.mei_class(), expected);
        assert_eq!(*record.to_interval().unwrap().val(), expected);
    }

    #[rstest]
    fn test_short_record_is_an_error() {
        let err = RmskReader::new("585\t1892\tchr1\n".as_bytes())
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingFields { line: 1, expected: 17, found: 3 }));
    }

    #[rstest]
    fn test_fixture() {
        let path = std::env::current_dir().unwrap().join("../tests/data/rmsk.txt");
        let records: Vec<RmskRecord> = RmskReader::from_path(path)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 5);
        let classes: Vec<MeiClass> = records.iter().map(|r| r.mei_class()).collect();
        assert_eq!(
            classes,
            vec![MeiClass::Alu, MeiClass::L1, MeiClass::Sva, MeiClass::Other, MeiClass::Alu]
        );
    }
}
