//! Run configuration resolved from the command line.

use std::path::PathBuf;

use ucunit_report::ConvertOptions;

use crate::error::Error;

/// Default tracing filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Usage text printed when wrapper mode is missing arguments.
pub const USAGE: &str = "\
Usage: ucunit-junit [OPTIONS] <OUTPUT> <EXECUTABLE> [ARGS]...
       ucunit-junit --pipe [OPTIONS] < report.json > report.xml";

/// How the report is obtained and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// JSON on stdin, XML on stdout
    Pipe,
    /// Run `command`, convert its stdout, write XML to `output`
    Wrap {
        output: PathBuf,
        command: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub convert: ConvertOptions,
    pub log_level: String,
}

impl Config {
    /// Resolve the mode from the `--pipe` switch and the positional arguments.
    ///
    /// Wrapper mode needs `<OUTPUT> <EXECUTABLE>` at least; pipe mode takes no
    /// positionals at all.
    pub fn resolve(
        pipe: bool,
        positionals: Vec<String>,
        convert: ConvertOptions,
        log_level: String,
    ) -> Result<Self, Error> {
        let mode = if pipe {
            if !positionals.is_empty() {
                return Err(Error::Usage(format!(
                    "--pipe takes no positional arguments\n\n{}",
                    USAGE
                )));
            }
            Mode::Pipe
        } else {
            if positionals.len() < 2 {
                return Err(Error::Usage(USAGE.to_string()));
            }
            let mut positionals = positionals.into_iter();
            let output = positionals.next().map(PathBuf::from).unwrap_or_default();
            Mode::Wrap {
                output,
                command: positionals.collect(),
            }
        };

        Ok(Self {
            mode,
            convert,
            log_level,
        })
    }
}
