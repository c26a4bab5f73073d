use std::fs::read_to_string;
use std::path::Path;

use anyhow::Result;
use clap::ArgMatches;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use svannot_hits::CoverageMode;
use svannot_io::DelFilter;
use svannot_overlaprs::MatchPolicy;
use svannot_overlaprs::policy::{
    ALU_TOLERANCE, DEFAULT_RECIPROCAL_THRESHOLD, L1_TOLERANCE, SVA_TOLERANCE, TieBreak,
};

///
/// Thresholds for an annotation run, read from a TOML file. Every key is optional.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotationConfig {
    pub reciprocal_threshold: f64,
    pub alu_tolerance: u64,
    pub l1_tolerance: u64,
    pub sva_tolerance: u64,
    pub tie_break: TieBreak,
    pub min_del_len: u64,
    pub max_del_len: u64,
    pub coverage_mode: CoverageMode,
    pub threads: Option<usize>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        let filter = DelFilter::default();
        AnnotationConfig {
            reciprocal_threshold: DEFAULT_RECIPROCAL_THRESHOLD,
            alu_tolerance: ALU_TOLERANCE,
            l1_tolerance: L1_TOLERANCE,
            sva_tolerance: SVA_TOLERANCE,
            tie_break: TieBreak::default(),
            min_del_len: filter.min_len,
            max_del_len: filter.max_len,
            coverage_mode: CoverageMode::default(),
            threads: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AnnotationConfigError {
    #[error("reciprocal_threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("min_del_len ({min}) must be smaller than max_del_len ({max})")]
    InvalidDelWindow { min: u64, max: u64 },
    #[error("threads must be at least 1")]
    InvalidThreads,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type AnnotationConfigResult<T> = std::result::Result<T, AnnotationConfigError>;

impl AnnotationConfig {
    pub fn validate(&self) -> AnnotationConfigResult<()> {
        check_threshold(self.reciprocal_threshold)?;
        if self.min_del_len >= self.max_del_len {
            return Err(AnnotationConfigError::InvalidDelWindow {
                min: self.min_del_len,
                max: self.max_del_len,
            });
        }
        if self.threads == Some(0) {
            return Err(AnnotationConfigError::InvalidThreads);
        }
        Ok(())
    }

    pub fn match_policy(&self) -> MatchPolicy {
        MatchPolicy {
            reciprocal_threshold: self.reciprocal_threshold,
            alu_tolerance: self.alu_tolerance,
            l1_tolerance: self.l1_tolerance,
            sva_tolerance: self.sva_tolerance,
            tie_break: self.tie_break,
        }
    }

    pub fn del_filter(&self) -> DelFilter {
        DelFilter {
            min_len: self.min_del_len,
            max_len: self.max_del_len,
        }
    }

    /// Threads for external tools; the configured count or 1.
    pub fn num_threads(&self) -> usize {
        self.threads.unwrap_or(1)
    }
}

///
/// Reject overlap fractions outside `(0, 1]`, NaN included.
///
pub fn check_threshold(threshold: f64) -> AnnotationConfigResult<f64> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(threshold)
    } else {
        Err(AnnotationConfigError::InvalidThreshold(threshold))
    }
}

impl TryFrom<&Path> for AnnotationConfig {
    type Error = AnnotationConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: AnnotationConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

///
/// Build the run configuration from the global `--config` and `--threads` options, and
/// size the global rayon pool accordingly. `--threads` wins over the file.
///
pub fn resolve(matches: &ArgMatches) -> Result<AnnotationConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => {
            info!("Loading configuration from {}", path);
            AnnotationConfig::try_from(Path::new(path))?
        }
        None => AnnotationConfig::default(),
    };

    if let Some(threads) = matches.get_one::<usize>("threads") {
        config.threads = Some(*threads);
        config.validate()?;
    }

    if let Some(threads) = config.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }
    debug!("{:?}", config);

    Ok(config)
}
