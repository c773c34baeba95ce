//! `uaportd` binary: serves the gateway on stdin and stdout.

use std::process::ExitCode;

fn main() -> ExitCode {
    uaportd::run()
}
