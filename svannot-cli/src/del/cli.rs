use clap::{Command, arg};

pub const DEL_CMD: &str = "del";

pub fn create_del_cli() -> Command {
    Command::new(DEL_CMD)
        .author("svannot developers")
        .about("Annotate deletions that remove a whole Alu, L1 or SVA element")
        .arg_required_else_help(true)
        .arg(arg!(-v --vcf <vcf> "SV calls in VCF format, or - for stdin"))
        .arg(arg!(-r --rmsk <rmsk> "RepeatMasker table (UCSC rmsk.txt layout)"))
        .arg(arg!(-o --output <output> "Output file, one `id<TAB>class` line per annotated deletion"))
}
