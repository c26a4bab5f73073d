use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use log::info;

use svannot_io::BLAST_OUTFMT;

pub const BLASTN: &str = "blastn";

///
/// The `blastn` invocation for one query FASTA against a nucleotide database, with the
/// tabular layout the report reader expects.
///
pub fn blastn_command(query: &Path, db: &Path, threads: usize) -> Command {
    let mut cmd = Command::new(BLASTN);
    cmd.arg("-query")
        .arg(query)
        .arg("-db")
        .arg(db)
        .arg("-outfmt")
        .arg(BLAST_OUTFMT)
        .arg("-num_threads")
        .arg(threads.to_string());
    cmd
}

///
/// Run `blastn` with stdout redirected to `output`.
///
/// # Arguments
/// - query: FASTA file of inserted sequences
/// - db: BLAST database prefix
/// - threads: value for `-num_threads`
/// - output: path of the tabular report to write
pub fn run_blastn(query: &Path, db: &Path, threads: usize, output: &Path) -> Result<()> {
    let report = File::create(output)
        .with_context(|| format!("Failed to create BLAST report: {:?}", output))?;

    info!("Running {} on {:?} against {:?}", BLASTN, query, db);
    let status = blastn_command(query, db, threads)
        .stdout(Stdio::from(report))
        .status()
        .with_context(|| format!("Failed to launch {}", BLASTN))?;

    if !status.success() {
        bail!("{} failed with {}", BLASTN, status);
    }
    Ok(())
}
