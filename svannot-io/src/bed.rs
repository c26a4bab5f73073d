use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use svannot_core::models::Region;
use svannot_core::utils::get_dynamic_reader_w_stdin;

use crate::error::{ParseError, Result};
use crate::lines::{DataLines, Fields};

fn is_bed_header(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("track") || line.starts_with("browser")
}

///
/// Streaming BED reader.
///
/// Columns past the third are kept verbatim (tab-joined) in [`Region::rest`].
/// Coordinates are taken as written and treated as closed by the index.
///
pub struct BedReader<R> {
    lines: DataLines<R>,
}

impl<R: BufRead> BedReader<R> {
    pub fn new(reader: R) -> Self {
        BedReader {
            lines: DataLines::new(reader, is_bed_header),
        }
    }
}

impl BedReader<BufReader<Box<dyn Read>>> {
    ///
    /// Open a BED file, gzipped or not. A path of `-` reads standard input.
    ///
    /// # Arguments
    /// - path: the path to the file to read
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(BedReader::new(get_dynamic_reader_w_stdin(path.as_ref())?))
    }
}

impl<R: BufRead> Iterator for BedReader<R> {
    type Item = Result<Region>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line_no, line) = match self.lines.next()? {
            Ok(next) => next,
            Err(e) => return Some(Err(e)),
        };
        Some(parse_bed_line(line_no, &line))
    }
}

fn parse_bed_line(line_no: usize, line: &str) -> Result<Region> {
    let fields = Fields::split(line_no, line, 3)?;
    let start: u32 = fields.parse(1, "start")?;
    let end: u32 = fields.parse(2, "end")?;
    if start > end {
        return Err(ParseError::InvertedInterval {
            line: line_no,
            start: start as u64,
            end: end as u64,
        });
    }
    Ok(Region {
        chr: fields.get(0).to_string(),
        start,
        end,
        rest: fields.tail(3),
    })
}

///
/// Read every region of a BED file into memory.
///
pub fn read_bed<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Region>> {
    let regions = BedReader::from_path(path.as_ref())?.collect::<Result<Vec<_>>>()?;
    Ok(regions)
}
