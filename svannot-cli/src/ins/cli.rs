use clap::{ArgGroup, Command, arg};

pub const INS_CMD: &str = "ins";

pub fn create_ins_cli() -> Command {
    Command::new(INS_CMD)
        .author("svannot developers")
        .about("Annotate inserted sequences with their best BLAST target")
        .arg_required_else_help(true)
        .arg(arg!(-b --blast <report> "Existing BLAST tabular report, or - for stdin").required(false))
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
        .arg(arg!(-o --output <output> "Output annotation table"))
}
