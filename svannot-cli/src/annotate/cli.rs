use clap::{ArgGroup, Command, arg};

pub const ANNOTATE_CMD: &str = "annotate";

pub fn create_annotate_cli() -> Command {
    Command::new(ANNOTATE_CMD)
        .author("svannot developers")
        .about("Annotate the deletions and insertions of a VCF and write an SV report with a summary")
        .arg_required_else_help(true)
        .arg(arg!(-v --vcf <vcf> "SV calls in VCF format, or - for stdin"))
        .arg(arg!(-r --rmsk <rmsk> "RepeatMasker table (UCSC rmsk.txt layout)"))
        .arg(arg!(-b --blast <report> "Existing BLAST tabular report of the inserted sequences").required(false))
        .arg(
            arg!(-f --fasta <fasta> "Inserted sequences to align with blastn")
                .required(false)
                .requires("db"),
        )
        .arg(
            arg!(-d --db <db> "BLAST database of mobile element and viral sequences")
                .required(false)
                .requires("fasta"),
        )
        .group(
            ArgGroup::new("alignments")
                .args(["blast", "fasta"])
                .required(true),
        )
        .arg(arg!(-o --output <output> "SV report; the summary goes to <output>.summary"))
}
