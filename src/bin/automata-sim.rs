//! automata-sim - simulate NFAs, NPDAs and context-free grammars
//!
//! Exit status: 0 when the input is accepted, 1 when it is rejected and 2
//! for any error.

use clap::Parser;
use colored::Colorize;
use std::process;

use automata_sim::cli::commands;
use automata_sim::cli::Cli;
use automata_sim::search::Verdict;

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    match commands::execute(cli) {
        Ok(Some(Verdict::Reject)) => process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            process::exit(2);
        }
    }
}
