use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use svannot_core::models::Interval;
use svannot_io::{BedReader, read_bed};
use svannot_overlaprs::{IntoMultiChromBinIndex, reciprocal_overlap};

use crate::config::{AnnotationConfig, check_threshold};

pub fn run_overlap(matches: &ArgMatches, config: &AnnotationConfig) -> Result<()> {
    let query_file = matches
        .get_one::<String>("query")
        .context("A path to a query file is required.")?;

    let universe_file = matches
        .get_one::<String>("universe")
        .context("A path to a universe file is required.")?;

    let threshold = matches
        .get_one::<f64>("threshold")
        .copied()
        .unwrap_or(config.reciprocal_threshold);

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    let n = write_overlaps(
        Path::new(query_file),
        Path::new(universe_file),
        threshold,
        &mut writer,
    )?;
    writer.flush()?;

    info!("Wrote {} overlapping pairs", n);
    Ok(())
}

///
/// Index `universe`, then write every query/universe pair that overlaps reciprocally by
/// at least `threshold` as `chrom qstart qend chrom sstart send`. Returns the number of
/// pairs written.
///
/// A threshold outside `(0, 1]` is an error, as in the config file.
///
pub fn write_overlaps<W: Write>(
    query: &Path,
    universe: &Path,
    threshold: f64,
    out: &mut W,
) -> Result<usize> {
    let threshold = check_threshold(threshold)?;
    let index = read_bed(universe)?.into_multi_chrom_bin_index();
    info!(
        "Indexed {} universe intervals on {} chromosomes",
        index.len(),
        index.chromosomes().len()
    );

    let queries = BedReader::from_path(query)?
        .map(|region| -> Result<(String, Interval<u32, ()>)> {
            let region = region?;
            let interval = Interval::new(region.start, region.end, ())?;
            Ok((region.chr, interval))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut n = 0;
    for ((chr, query), hits) in queries.iter().zip(index.par_find_overlaps(&queries)) {
        for hit in hits {
            if reciprocal_overlap(query, hit, threshold) {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    chr,
                    query.start(),
                    query.end(),
                    chr,
                    hit.start(),
                    hit.end()
                )?;
                n += 1;
            }
        }
    }

    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    use std::path::PathBuf;

    fn get_test_path(file_name: &str) -> PathBuf {
        PathBuf::from("../tests/data").join(file_name)
    }

    #[rstest]
    fn test_write_overlaps() {
        let mut out = Vec::new();
        let n = write_overlaps(
            &get_test_path("query.bed"),
            &get_test_path("universe.bed"),
            0.5,
            &mut out,
        )
        .unwrap();

        assert_eq!(n, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "chr1\t1005\t1195\tchr1\t1000\t1199\n\
             chr1\t5100\t10900\tchr1\t5000\t11000\n\
             chr2\t29990\t30510\tchr2\t30000\t30500\n"
        );
    }

    #[rstest]
    fn test_strict_threshold_drops_pairs() {
        // the Alu query covers 95.5% of its repeat and falls out
        let mut out = Vec::new();
        let n = write_overlaps(
            &get_test_path("query.bed"),
            &get_test_path("universe.bed"),
            0.96,
            &mut out,
        )
        .unwrap();
        assert_eq!(n, 2);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-0.5)]
    #[case(1.5)]
    #[case(f64::NAN)]
    fn test_threshold_out_of_range(#[case] threshold: f64) {
        let mut out = Vec::new();
        let result = write_overlaps(
            &get_test_path("query.bed"),
            &get_test_path("universe.bed"),
            threshold,
            &mut out,
        );
        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[rstest]
    fn test_run_overlap_rejects_zero_threshold() {
        let matches = crate::overlap::cli::create_overlap_cli().get_matches_from([
            "overlap",
            "-q",
            "../tests/data/query.bed",
            "-u",
            "../tests/data/universe.bed",
            "-t",
            "0",
        ]);
        let err = run_overlap(&matches, &AnnotationConfig::default()).unwrap_err();
        assert!(err.to_string().contains("reciprocal_threshold"));
    }
}
