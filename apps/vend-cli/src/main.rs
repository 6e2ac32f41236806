//! # Vending Machine Entry Point
//!
//! All setup lives in `lib.rs` so the shell can be driven from tests.

use std::process::ExitCode;

fn main() -> ExitCode {
    vend_cli::run()
}
