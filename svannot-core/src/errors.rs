use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IntervalError {
    #[error("Invalid interval: start {start} is larger than end {end}")]
    InvalidInterval { start: u64, end: u64 },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SegmentError {
    #[error("Invalid alignment segment {query}/{subject}: query start {qstart} is larger than query end {qend}")]
    InvertedQuerySpan {
        query: String,
        subject: String,
        qstart: u64,
        qend: u64,
    },

    #[error("Invalid alignment segment {query}/{subject}: zero coordinate in 1-based span")]
    ZeroCoordinate { query: String, subject: String },
}
