use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use env_logger::Env;

/// Enumerate all satisfying assignments of a batch of CNF systems.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Binary batch of systems to solve
    input: PathBuf,
    /// Where to write the solutions
    output: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match cnf_allsat::run(&cli.input, &cli.output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cnf-allsat: {err}");
            ExitCode::FAILURE
        }
    }
}
