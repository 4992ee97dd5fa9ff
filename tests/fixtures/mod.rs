//! Report fixtures shared by the integration tests.
//!
//! - `list_sample.json`: uCUnit JSON output of the ListSample suite, with one
//!   failing test case and the trailing `{}` records uCUnit always emits
//! - `missing_name.json`: a report without the suite `name`

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Contents of a fixture file
pub fn fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

/// Write a shell script that prints `report` on stdout and exits with `code`.
///
/// Run it through `sh` rather than executing it directly, which avoids
/// ETXTBSY races with other tests spawning processes.
pub fn fake_test_script(dir: &Path, report: &str, code: i32) -> PathBuf {
    let path = dir.join("fake-tests.sh");
    let script = format!("cat <<'UCUNIT_EOF'\n{}\nUCUNIT_EOF\nexit {}\n", report, code);
    fs::write(&path, script).expect("Failed to write fake test script");
    path
}
