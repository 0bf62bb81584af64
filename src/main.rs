//! mdquote - keeps quoted excerpts in markdown documents in sync

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = mdquote::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
