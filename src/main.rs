//! ucunit-junit CLI
//!
//! Entry point for the `ucunit-junit` command-line tool.

use std::process;

fn main() {
    process::exit(ucunit_junit::cli::run());
}
