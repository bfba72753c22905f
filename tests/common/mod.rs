//! Shared helpers for the chartname test suites.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;

/// Release names helm 3 accepts are at most 53 characters.
pub const HELM_RELEASE_NAME_LIMIT: usize = 53;

/// The bundled five-kind chart under `tests/fixtures/chart`.
pub fn fixture_chart() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/chart")
}

/// Whether a `helm` binary is available for the real-renderer tests.
pub fn helm_available() -> bool {
    which::which("helm").is_ok()
}

/// The `chartname` binary with progress bars, colors and inherited config
/// variables turned off.
pub fn chartname() -> Command {
    let mut cmd = Command::cargo_bin("chartname").unwrap();
    cmd.env("CHARTNAME_NO_PROGRESS", "1")
        .env("NO_COLOR", "1")
        .env_remove("CHARTNAME_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}
