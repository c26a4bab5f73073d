use std::fmt::{self, Display};

use crate::errors::IntervalError;
use crate::models::Interval;

///
/// Region struct, one record of a BED-like file with closed coordinates.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct Region {
    pub chr: String,
    pub start: u32,
    pub end: u32,

    pub rest: Option<String>,
}

impl Region {
    ///
    /// Number of bases covered by the region (both ends inclusive)
    ///
    pub fn size(&self) -> u32 {
        self.end - self.start + 1
    }

    ///
    /// Get file string of Region
    ///
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}{}",
            self.chr,
            self.start,
            self.end,
            self.rest
                .as_deref()
                .map_or(String::new(), |s| format!("\t{}", s)),
        )
    }

    ///
    /// Convert the region into an [Interval] carrying the trailing columns as payload.
    ///
    pub fn to_interval(&self) -> Result<Interval<u32, Option<String>>, IntervalError> {
        Interval::new(self.start, self.end, self.rest.clone())
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_as_string_with_rest() {
        let region = Region {
            chr: "chr1".to_string(),
            start: 100,
            end: 200,
            rest: Some("AluY".to_string()),
        };
        assert_eq!(region.as_string(), "chr1\t100\t200\tAluY");
        assert_eq!(region.size(), 101);
    }

    #[rstest]
    fn test_to_interval_rejects_inverted() {
        let region = Region {
            chr: "chr1".to_string(),
            start: 300,
            end: 200,
            rest: None,
        };
        assert!(region.to_interval().is_err());
    }
}
