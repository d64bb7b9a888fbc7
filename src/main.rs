//! ds - command-line entry point for datastudio.

use std::process::ExitCode;

use datastudio::ui::output;

fn main() -> ExitCode {
    match datastudio::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
