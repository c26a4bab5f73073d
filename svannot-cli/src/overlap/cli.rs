use clap::{Command, arg, value_parser};

pub use svannot_overlaprs::consts::OVERLAP_CMD;

pub fn create_overlap_cli() -> Command {
    Command::new(OVERLAP_CMD)
        .author("svannot developers")
        .about("Report query/universe interval pairs with reciprocal overlap")
        .arg_required_else_help(true)
        .arg(arg!(-q --query <query> "BED file of query intervals, or - for stdin"))
        .arg(arg!(-u --universe <universe> "BED file of reference intervals"))
        .arg(
            arg!(-t --threshold <threshold> "Minimum overlap fraction required on both intervals")
                .value_parser(value_parser!(f64))
                .required(false),
        )
}
