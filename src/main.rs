//! Binary entry point for the `sift` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    sift::cli::run()
}
