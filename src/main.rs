//! Pidlocker: single-instance locking through PID files.
//!
//! Entry point for the `pidlocker` binary. Parses arguments, dispatches to
//! the command handler, and maps errors to exit codes.

mod cli;
mod commands;

use cli::Cli;
use pidlocker::exit_codes;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
