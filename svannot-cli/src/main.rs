mod annotate;
mod blast;
mod config;
mod del;
mod ins;
mod overlap;

use anyhow::Result;
use clap::{Command, arg, value_parser};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "svannot";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Annotate structural variants with the mobile elements and viral sequences they delete or insert.")
        .subcommand_required(true)
        .arg(
            arg!(-c --config <config> "TOML file with annotation thresholds")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--threads <threads> "Worker threads for parallel steps and blastn")
                .value_parser(value_parser!(usize))
                .required(false)
                .global(true),
        )
        .subcommand(overlap::cli::create_overlap_cli())
        .subcommand(del::cli::create_del_cli())
        .subcommand(ins::cli::create_ins_cli())
        .subcommand(annotate::cli::create_annotate_cli())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // RECIPROCAL OVERLAPS
        //
        Some((overlap::cli::OVERLAP_CMD, matches)) => {
            let config = config::resolve(matches)?;
            overlap::handlers::run_overlap(matches, &config)?;
        }

        //
        // DELETIONS
        //
        Some((del::cli::DEL_CMD, matches)) => {
            let config = config::resolve(matches)?;
            del::handlers::run_del(matches, &config)?;
        }

        //
        // INSERTIONS
        //
        Some((ins::cli::INS_CMD, matches)) => {
            let config = config::resolve(matches)?;
            ins::handlers::run_ins(matches, &config)?;
        }

        //
        // FULL RUN
        //
        Some((annotate::cli::ANNOTATE_CMD, matches)) => {
            let config = config::resolve(matches)?;
            annotate::handlers::run_annotate(matches, &config)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
