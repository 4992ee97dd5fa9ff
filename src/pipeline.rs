//! Conversion pipeline for both modes.
//!
//! Pipe mode: stdin → JSON decode → convert → stdout.
//! Wrapper mode: runner → captured stdout → JSON decode → convert → file,
//! with the wrapped executable's exit code as the result.

use std::io::{self, Read};

use ucunit_report::{convert_with, ConvertOptions, Report, ReportError};

use crate::config::{Config, Mode};
use crate::error::Error;
use crate::runner;
use crate::sink::ReportSink;

/// Serialized report plus the exit code the tool should finish with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub xml: String,
    pub exit_code: i32,
}

/// Convert a JSON report read from `input` into XML.
pub fn convert_input<R: Read>(input: R, options: &ConvertOptions) -> Result<String, ReportError> {
    let report = Report::from_reader(input)?;
    convert_with(&report, options).to_xml()
}

/// Convert a captured JSON report into XML.
pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> Result<String, ReportError> {
    let report = Report::from_slice(bytes)?;
    convert_with(&report, options).to_xml()
}

/// Run the wrapped executable and convert what it printed.
///
/// Fails only when the executable cannot be launched or its output is not a
/// valid report; a non-zero exit is carried in [`Outcome::exit_code`].
pub fn wrap(command: &[String], options: &ConvertOptions) -> Result<Outcome, Error> {
    let output = runner::run(command)?;

    let xml = match convert_bytes(&output.stdout, options) {
        Ok(xml) => xml,
        Err(e) => {
            if !output.success() {
                tracing::warn!(
                    exit_code = output.exit_code,
                    "test executable failed without printing a valid report"
                );
            }
            return Err(e.into());
        }
    };

    Ok(Outcome {
        xml,
        exit_code: output.exit_code,
    })
}

/// Execute a resolved configuration and return the process exit code.
pub fn execute(config: &Config) -> Result<i32, Error> {
    match &config.mode {
        Mode::Pipe => {
            let stdin = io::stdin();
            let xml = convert_input(stdin.lock(), &config.convert)?;
            write_report(&ReportSink::Stdout, &xml)?;
            Ok(0)
        }
        Mode::Wrap { output, command } => {
            let outcome = wrap(command, &config.convert)?;
            write_report(&ReportSink::File(output.clone()), &outcome.xml)?;
            if outcome.exit_code != 0 {
                tracing::warn!(exit_code = outcome.exit_code, "test executable exited with failure");
            }
            Ok(outcome.exit_code)
        }
    }
}

fn write_report(sink: &ReportSink, xml: &str) -> Result<(), Error> {
    sink.write(xml).map_err(|source| Error::Write {
        path: sink.describe(),
        source,
    })?;
    tracing::info!(destination = %sink.describe(), bytes = xml.len(), "wrote JUnit report");
    Ok(())
}
