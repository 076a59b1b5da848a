//! stackexec CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, submit the
//! requested run files, reconcile their artifacts, and exit with an
//! appropriate status. For programmatic use, prefer the library API
//! (`stackexec::api`).

use std::process::ExitCode;

use clap::Parser;

mod cli;

fn main() -> ExitCode {
    let args = cli::CliArgs::parse();
    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("stackexec: {}", e);
            ExitCode::FAILURE
        }
    }
}
