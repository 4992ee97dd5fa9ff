//! Top-level error type and exit codes.

use std::io;

use ucunit_report::ReportError;

use crate::runner::LaunchError;

/// Process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Anything that stops a conversion run before a report is written.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad command line; the message is the full usage text
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Failed to write report to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Every failure of the tool itself exits with 1; only a wrapped
    /// executable's own exit code can produce anything else.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::FAILURE
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Error::Usage(_) => "usage",
            Error::Launch(_) => "launch",
            Error::Report(e) => e.kind(),
            Error::Write { .. } => "write",
        }
    }
}
