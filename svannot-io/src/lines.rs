use std::io::{BufRead, Lines};
use std::str::FromStr;

use crate::error::{ParseError, Result};

///
/// Iterator over the data lines of a text table: blank lines and lines rejected by
/// `is_comment` are skipped, trailing `\r` is stripped, and each line comes with its
/// 1-based line number.
///
pub(crate) struct DataLines<R> {
    lines: Lines<R>,
    line_no: usize,
    is_comment: fn(&str) -> bool,
}

impl<R: BufRead> DataLines<R> {
    pub(crate) fn new(reader: R, is_comment: fn(&str) -> bool) -> Self {
        DataLines {
            lines: reader.lines(),
            line_no: 0,
            is_comment,
        }
    }
}

impl<R: BufRead> Iterator for DataLines<R> {
    type Item = Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;
            match line {
                Err(e) => return Some(Err(ParseError::Io(e))),
                Ok(mut line) => {
                    if line.ends_with('\r') {
                        line.pop();
                    }
                    if line.trim().is_empty() || (self.is_comment)(&line) {
                        continue;
                    }
                    return Some(Ok((self.line_no, line)));
                }
            }
        }
    }
}

/// `#`-prefixed header and comment lines.
pub(crate) fn hash_comment(line: &str) -> bool {
    line.starts_with('#')
}

/// The tab-separated columns of one record.
pub(crate) struct Fields<'a> {
    line: usize,
    cols: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    pub(crate) fn split(line: usize, text: &'a str, expected: usize) -> Result<Self> {
        let cols: Vec<&str> = text.split('\t').collect();
        if cols.len() < expected {
            return Err(ParseError::MissingFields {
                line,
                expected,
                found: cols.len(),
            });
        }
        Ok(Fields { line, cols })
    }

    pub(crate) fn len(&self) -> usize {
        self.cols.len()
    }

    pub(crate) fn get(&self, idx: usize) -> &'a str {
        self.cols[idx]
    }

    pub(crate) fn parse<T: FromStr>(&self, idx: usize, column: &'static str) -> Result<T> {
        let value = self.cols[idx];
        value.trim().parse().map_err(|_| ParseError::InvalidField {
            line: self.line,
            column,
            value: value.to_string(),
        })
    }

    pub(crate) fn tail(&self, from: usize) -> Option<String> {
        (self.cols.len() > from).then(|| self.cols[from..].join("\t"))
    }
}
