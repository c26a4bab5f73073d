use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use svannot_core::models::Interval;
use svannot_io::{ParseError, RmskReader, SvRecord, read_sv_vcf};
use svannot_overlaprs::{MeiClass, MultiChromBinIndex, match_feature};

use crate::config::AnnotationConfig;

pub fn run_del(matches: &ArgMatches, config: &AnnotationConfig) -> Result<()> {
    let vcf = matches
        .get_one::<String>("vcf")
        .context("A path to a VCF file is required.")?;
    let rmsk = matches
        .get_one::<String>("rmsk")
        .context("A path to a RepeatMasker table is required.")?;
    let output = matches
        .get_one::<String>("output")
        .context("An output path is required.")?;

    let records = read_sv_vcf(vcf)?;
    let index = load_rmsk_index(Path::new(rmsk))?;
    let annotations = annotate_deletions(&records, &index, config)?;

    let file = File::create(output).with_context(|| format!("Failed to create {}", output))?;
    let mut writer = BufWriter::new(file);
    for (id, class) in &annotations {
        writeln!(writer, "{}\t{}", id, class)?;
    }
    writer.flush()?;

    info!("Annotated {} deletions", annotations.len());
    Ok(())
}

///
/// Index a RepeatMasker table by chromosome, each repeat tagged with its element class.
///
pub fn load_rmsk_index(path: &Path) -> Result<MultiChromBinIndex<u32, MeiClass>> {
    let features = RmskReader::from_path(path)?
        .map(|record| -> Result<(String, Interval<u32, MeiClass>)> {
            let record = record?;
            let interval = record.to_interval()?;
            Ok((record.chrom, interval))
        })
        .collect::<Result<Vec<_>>>()?;

    let index = MultiChromBinIndex::build(features);
    info!(
        "Indexed {} repeats on {} chromosomes from {:?}",
        index.len(),
        index.chromosomes().len(),
        path
    );
    Ok(index)
}

///
/// Match every deletion that passes the length window against the repeat index.
///
/// Returns `(sv id, class)` for matched deletions, in VCF order. Queries are looked up
/// in parallel; the matching itself follows the configured policy.
///
pub fn annotate_deletions(
    records: &[SvRecord],
    index: &MultiChromBinIndex<u32, MeiClass>,
    config: &AnnotationConfig,
) -> Result<Vec<(String, MeiClass)>> {
    let filter = config.del_filter();
    let policy = config.match_policy();

    let queries = records
        .iter()
        .filter_map(|sv| sv.deletion_query(&filter).transpose())
        .collect::<Result<Vec<_>, ParseError>>()?;
    info!(
        "{} of {} SV records are deletions within the length window",
        queries.len(),
        records.len()
    );

    let annotated = queries
        .iter()
        .zip(index.par_find_overlaps(&queries))
        .filter_map(|((_, query), candidates)| {
            match_feature(query, candidates, &policy).map(|feature| (query.val().clone(), *feature.val()))
        })
        .filter(|(_, class)| *class != MeiClass::Other)
        .collect();

    Ok(annotated)
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

    #[fixture]
    fn index() -> MultiChromBinIndex<u32, MeiClass> {
        load_rmsk_index(&get_test_path("rmsk.txt")).unwrap()
    }

    #[fixture]
    fn records() -> Vec<SvRecord> {
        read_sv_vcf(get_test_path("sample.vcf")).unwrap()
    }

    #[rstest]
    fn test_load_rmsk_index(index: MultiChromBinIndex<u32, MeiClass>) {
        assert_eq!(index.len(), 5);
        assert_eq!(index.chromosomes(), vec!["chr1", "chr2", "chr3"]);
    }

    #[rstest]
    fn test_annotate_fixture(records: Vec<SvRecord>, index: MultiChromBinIndex<u32, MeiClass>) {
        let annotations = annotate_deletions(&records, &index, &AnnotationConfig::default()).unwrap();
        assert_eq!(
            annotations,
            vec![
                ("del1".to_string(), MeiClass::Alu),
                ("del2".to_string(), MeiClass::L1)
            ]
        );
    }

    #[rstest]
    fn test_tighter_alu_tolerance(records: Vec<SvRecord>, index: MultiChromBinIndex<u32, MeiClass>) {
        // del1 sits 5 bp inside its Alu on the left
        let config = AnnotationConfig {
            alu_tolerance: 4,
            ..AnnotationConfig::default()
        };
        let annotations = annotate_deletions(&records, &index, &config).unwrap();
        assert_eq!(annotations, vec![("del2".to_string(), MeiClass::L1)]);
    }

    #[rstest]
    fn test_inverted_deletion_fails(index: MultiChromBinIndex<u32, MeiClass>) {
        let bad = SvRecord::from_vcf_line(
            1,
            "1\t2000\tbad\tN\t<DEL>\t.\tPASS\tSVTYPE=DEL;SVLEN=-500;END=1500",
        )
        .unwrap();
        assert_eq!(
            annotate_deletions(&[bad], &index, &AnnotationConfig::default()).is_err(),
            true
        );
    }

    #[rstest]
    fn test_run_del_writes_output() {
        let tempdir = tempfile::tempdir().unwrap();
        let output = tempdir.path().join("del.annot.txt");

        let matches = crate::del::cli::create_del_cli().get_matches_from([
            "del",
            "-v",
            "../tests/data/sample.vcf",
            "-r",
            "../tests/data/rmsk.txt",
            "-o",
            output.to_str().unwrap(),
        ]);
        run_del(&matches, &AnnotationConfig::default()).unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "del1\tAlu\ndel2\tL1\n"
        );
    }
}
