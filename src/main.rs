//! `ehr-audit` binary entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    ehr_audit::cli::run()
}
