//! Report destinations.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Where the serialized XML goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSink {
    /// Standard output, followed by a newline
    Stdout,
    /// A file, replaced atomically
    File(PathBuf),
}

impl ReportSink {
    /// Write the serialized report.
    pub fn write(&self, xml: &str) -> io::Result<()> {
        match self {
            ReportSink::Stdout => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                out.write_all(xml.as_bytes())?;
                out.write_all(b"\n")?;
                out.flush()
            }
            ReportSink::File(path) => write_atomic(path, xml.as_bytes()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ReportSink::Stdout => "<stdout>".to_string(),
            ReportSink::File(path) => path.display().to_string(),
        }
    }
}

/// Write `contents` to a hidden sibling temp file, sync it, then rename it over
/// `path`. The destination is either the old file or the complete new one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let temp_path = temp_path_for(path);

    let result = (|| {
        let mut file = File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report.xml".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}
