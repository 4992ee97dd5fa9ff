//! Wrapped test executable invocation.
//!
//! The runner spawns the test binary, captures its standard output and hands
//! back the exit code. It never looks at the captured bytes.

use std::io;
use std::process::{Command, ExitStatus, Stdio};

/// Exit code reported when a child ends without one and no signal is known.
const UNKNOWN_EXIT_CODE: i32 = 1;

/// The wrapped executable could not be started.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("No executable given")]
    EmptyCommand,

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Captured result of a finished child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// Raw standard output
    pub stdout: Vec<u8>,
    /// Exit code; `128 + signal` for signal-terminated children on Unix
    pub exit_code: i32,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `command[0]` with the remaining elements as arguments.
///
/// Standard input and standard error are inherited; only standard output is
/// captured. A non-zero exit is returned as data, not as an error.
pub fn run(command: &[String]) -> Result<RunOutput, LaunchError> {
    let (program, args) = command.split_first().ok_or(LaunchError::EmptyCommand)?;

    tracing::info!(program = %program, args = args.len(), "running test executable");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|source| LaunchError::Spawn {
            program: program.clone(),
            source,
        })?;

    let exit_code = exit_code(output.status);
    tracing::debug!(exit_code, captured_bytes = output.stdout.len(), "test executable finished");

    Ok(RunOutput {
        stdout: output.stdout,
        exit_code,
    })
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    UNKNOWN_EXIT_CODE
}
