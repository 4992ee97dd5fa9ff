//! Command-line interface.
//!
//! Two modes:
//!
//! - `ucunit-junit <OUTPUT> <EXECUTABLE> [ARGS]...` runs the test executable,
//!   converts its JSON output and writes JUnit XML to `OUTPUT`. The exit code
//!   is the executable's own.
//! - `ucunit-junit --pipe` converts a JSON report on stdin to XML on stdout.
//!
//! Command functions return `Result`; only [`run_from`] prints diagnostics and
//! picks the exit code.

use std::ffi::OsString;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use ucunit_report::ConvertOptions;

use crate::config::{Config, DEFAULT_LOG_LEVEL};
use crate::error::{Error, ExitCode};
use crate::pipeline;

#[derive(Parser, Debug)]
#[command(name = "ucunit-junit")]
#[command(about = "Convert uCUnit JSON test reports into JUnit XML", version)]
pub struct Cli {
    /// Read the JSON report from stdin and write XML to stdout
    #[arg(long)]
    pub pipe: bool,

    /// Add checks-passed/checks-failed properties when the report has them
    #[arg(long)]
    pub check_counts: bool,

    /// Diagnostic log filter, e.g. "info" or "ucunit_report=debug"
    #[arg(long, value_name = "LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Output file, test executable and its arguments (wrapper mode)
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    pub fn into_config(self) -> Result<Config, Error> {
        Config::resolve(
            self.pipe,
            self.args,
            ConvertOptions {
                check_counts: self.check_counts,
            },
            self.log_level,
        )
    }
}

/// Entry point used by the binary.
pub fn run() -> i32 {
    run_from(std::env::args_os())
}

/// Parse `args` (program name first), run, and return the exit code.
pub fn run_from<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are reported through the error path too
            return if e.use_stderr() {
                ExitCode::FAILURE.0
            } else {
                ExitCode::SUCCESS.0
            };
        }
    };

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return e.exit_code().0;
        }
    };

    init_logging(&config.log_level);

    match pipeline::execute(&config) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(kind = e.kind(), "conversion failed");
            eprintln!("error: {}", e);
            e.exit_code().0
        }
    }
}

/// Install the stderr tracing subscriber.
fn init_logging(level: &str) {
    let filter = match EnvFilter::try_new(level) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("warning: invalid log level '{}' ({}), using '{}'", level, e, DEFAULT_LOG_LEVEL);
            EnvFilter::new(DEFAULT_LOG_LEVEL)
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
