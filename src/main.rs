//! Pubcheck - command-line harness verifying publish-output feature defaults

use std::process::ExitCode;

use pubcheck::cli;

fn main() -> ExitCode {
    cli::run()
}
