use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use svannot_io::{AnnotationSummary, SvAnnotations, read_blast_report, read_sv_vcf};

use crate::config::AnnotationConfig;
use crate::del::handlers::{annotate_deletions, load_rmsk_index};
use crate::ins::handlers::{annotate_insertions, blast_report_path};

pub fn run_annotate(matches: &ArgMatches, config: &AnnotationConfig) -> Result<()> {
    let vcf = matches
        .get_one::<String>("vcf")
        .context("A path to a VCF file is required.")?;
    let rmsk = matches
        .get_one::<String>("rmsk")
        .context("A path to a RepeatMasker table is required.")?;
    let output = matches
        .get_one::<String>("output")
        .context("An output path is required.")?;
    let output = Path::new(output);

    let report = blast_report_path(matches, output, config)?;
    let summary = annotate_vcf(Path::new(vcf), Path::new(rmsk), &report, output, config)?;

    info!(
        "Annotated {}/{} deletions and {}/{} insertions",
        summary.del.values().sum::<usize>(),
        summary.del_total,
        summary.ins.values().sum::<usize>(),
        summary.ins_total
    );
    Ok(())
}

///
/// Full annotation run: deletions against the repeat table, insertions through the
/// BLAST report, then the SV report at `output` and its summary at `<output>.summary`.
///
/// Deletions are labelled with their element class, insertions with the target type of
/// their best hit.
///
pub fn annotate_vcf(
    vcf: &Path,
    rmsk: &Path,
    blast_report: &Path,
    output: &Path,
    config: &AnnotationConfig,
) -> Result<AnnotationSummary> {
    let records = read_sv_vcf(vcf)?;
    let index = load_rmsk_index(rmsk)?;

    let mut annotations = SvAnnotations::default();
    annotations.del = annotate_deletions(&records, &index, config)?
        .into_iter()
        .map(|(id, class)| (id, class.to_string()))
        .collect();

    let segments = read_blast_report(blast_report)?;
    annotations.ins = annotate_insertions(segments, config.coverage_mode)
        .into_iter()
        .map(|row| (row.id, row.target_type))
        .collect();

    let summary = annotations
        .write_report_files(&records, output)
        .with_context(|| format!("Failed to write SV report to {:?}", output))?;
    Ok(summary)
}
