//! ucunit-junit - uCUnit JSON to JUnit XML converter
//!
//! This crate wraps a uCUnit test executable (or reads its JSON report from
//! stdin), converts the report into JUnit-compatible XML and forwards the
//! executable's exit code, so CI dashboards can consume microcontroller test
//! runs.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod runner;
pub mod sink;

pub use config::{Config, Mode};
pub use error::{Error, ExitCode};
pub use pipeline::{convert_bytes, convert_input, execute, wrap, Outcome};
pub use runner::{LaunchError, RunOutput};
pub use sink::ReportSink;
pub use ucunit_report::{ConvertOptions, Report, ReportError};
