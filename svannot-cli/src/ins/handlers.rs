use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{info, warn};

use svannot_core::models::AlignmentSegment;
use svannot_hits::{CoverageMode, InsAnnotation, assemble_query_hits, best_hits_par};
use svannot_io::read_blast_report;

use crate::blast::run_blastn;
use crate::config::AnnotationConfig;

pub fn run_ins(matches: &ArgMatches, config: &AnnotationConfig) -> Result<()> {
    let output = matches
        .get_one::<String>("output")
        .context("An output path is required.")?;
    let output = Path::new(output);

    let report = blast_report_path(matches, output, config)?;
    let segments = read_blast_report(&report)?;
    let rows = annotate_insertions(segments, config.coverage_mode);

    let file = File::create(output).with_context(|| format!("Failed to create {:?}", output))?;
    let mut writer = BufWriter::new(file);
    write_ins_annotations(&rows, &mut writer)?;
    writer.flush()?;

    info!("Annotated {} inserted sequences", rows.len());
    Ok(())
}

///
/// The BLAST report to read: the `--blast` file when given, otherwise a fresh `blastn`
/// run of `--fasta` against `--db`, written next to `output` as `<output>.blast.txt`.
///
pub fn blast_report_path(
    matches: &ArgMatches,
    output: &Path,
    config: &AnnotationConfig,
) -> Result<PathBuf> {
    if let Some(report) = matches.get_one::<String>("blast") {
        return Ok(PathBuf::from(report));
    }

    let fasta = matches
        .get_one::<String>("fasta")
        .context("Either a BLAST report or a FASTA file and database are required.")?;
    let db = matches
        .get_one::<String>("db")
        .context("A BLAST database is required with --fasta.")?;

    let mut report = output.as_os_str().to_owned();
    report.push(".blast.txt");
    let report = PathBuf::from(report);

    run_blastn(Path::new(fasta), Path::new(db), config.num_threads(), &report)?;
    Ok(report)
}

///
/// Group segments into hits per inserted sequence and keep the best target of each.
/// Sequences whose hits all score zero are left out.
///
pub fn annotate_insertions(segments: Vec<AlignmentSegment>, mode: CoverageMode) -> Vec<InsAnnotation> {
    let groups = assemble_query_hits(segments);
    let best = best_hits_par(&groups, mode);
    if best.len() < groups.len() {
        warn!(
            "{} of {} sequences have no hit with positive coverage",
            groups.len() - best.len(),
            groups.len()
        );
    }
    best.into_iter().map(|hit| hit.annotation(mode)).collect()
}

pub fn write_ins_annotations<W: Write>(rows: &[InsAnnotation], out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", InsAnnotation::HEADER)?;
    for row in rows {
        writeln!(out, "{}", row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn segments() -> Vec<AlignmentSegment> {
        read_blast_report("../tests/data/ins.blast.txt").unwrap()
    }

    #[rstest]
    #[case(CoverageMode::Neighbor)]
    #[case(CoverageMode::Union)]
    fn test_best_targets(segments: Vec<AlignmentSegment>, #[case] mode: CoverageMode) {
        let rows = annotate_insertions(segments, mode);
        let picked: Vec<(&str, &str, &str)> = rows
            .iter()
            .map(|r| (r.id.as_str(), r.target.as_str(), r.target_type.as_str()))
            .collect();
        assert_eq!(
            picked,
            vec![("ins1", "AluYa5.1", "AluYa5"), ("ins2", "L1HS.1", "L1HS")]
        );
    }

    #[rstest]
    fn test_split_minus_strand_hit_covers_everything(segments: Vec<AlignmentSegment>) {
        let rows = annotate_insertions(segments, CoverageMode::Neighbor);
        let l1 = &rows[1];
        assert_eq!(l1.query_length, 6000);
        assert_eq!(l1.target_length, 6019);
        assert_eq!(l1.query_cov, 1.0);
        assert_eq!(l1.target_cov, 1.0);
        assert_eq!(l1.mean_identity, 98.75);
    }

    #[rstest]
    fn test_table_has_header(segments: Vec<AlignmentSegment>) {
        let rows = annotate_insertions(segments, CoverageMode::Neighbor);
        let mut out = Vec::new();
        write_ins_annotations(&rows, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], InsAnnotation::HEADER);
        assert_eq!(lines[1].split('\t').count(), 8);
    }

    #[rstest]
    fn test_run_ins_from_report() {
        let tempdir = tempfile::tempdir().unwrap();
        let output = tempdir.path().join("ins.annot.txt");

        let matches = crate::ins::cli::create_ins_cli().get_matches_from([
            "ins",
            "-b",
            "../tests/data/ins.blast.txt",
            "-o",
            output.to_str().unwrap(),
        ]);
        run_ins(&matches, &AnnotationConfig::default()).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(2).unwrap().starts_with("ins2\tL1HS.1\tL1HS\t6000\t6019\t1\t1\t"));
    }

    #[rstest]
    fn test_fasta_requires_db() {
        let result = crate::ins::cli::create_ins_cli().try_get_matches_from([
            "ins", "-f", "ins.fa", "-o", "out.txt",
        ]);
        assert_eq!(result.is_err(), true);
    }

    #[rstest]
    fn test_alignments_are_required() {
        let result = crate::ins::cli::create_ins_cli().try_get_matches_from(["ins", "-o", "out.txt"]);
        assert_eq!(result.is_err(), true);
    }
}
