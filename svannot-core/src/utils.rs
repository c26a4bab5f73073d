use std::ffi::OsStr;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;

/// Input path that stands for standard input.
pub const STDIN_PATH: &str = "-";

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    let reader = BufReader::new(file);

    Ok(reader)
}

///
/// Same as [`get_dynamic_reader`], except that a path of `-` reads standard input.
/// Input read from stdin is never decompressed.
///
pub fn get_dynamic_reader_w_stdin(path: &Path) -> Result<BufReader<Box<dyn Read>>> {
    if path.as_os_str() == OsStr::new(STDIN_PATH) {
        let stdin: Box<dyn Read> = Box::new(std::io::stdin().lock());
        return Ok(BufReader::new(stdin));
    }
    get_dynamic_reader(path)
}

///
/// Prefix a contig name with `chr` unless it already carries it, so that
/// `1` from a VCF lines up with `chr1` from RepeatMasker.
///
pub fn with_chr_prefix(chrom: &str) -> String {
    if chrom.contains("chr") {
        chrom.to_string()
    } else {
        format!("chr{}", chrom)
    }
}

///
/// The part of a sequence id before the first `.`, e.g. `HERVK.3` -> `HERVK`.
///
pub fn id_prefix(id: &str) -> &str {
    id.split('.').next().unwrap_or(id)
}
