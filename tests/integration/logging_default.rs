//! Integration tests for default log-to-file behavior.
//!
//! Verifies that running the CLI without --quiet writes logs to the default
//! file path under the platform state directory.

use crate::integration::test_utils::run_cli;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Matches default_log_file_path in src/logging.rs: state_dir is
/// $XDG_STATE_HOME/lessonforge, then workspace segments are appended.
fn expected_log_path(state_home: &Path, workspace: &Path) -> std::path::PathBuf {
    let canonical = workspace.canonicalize().unwrap();
    let mut base = state_home.join("lessonforge");
    for component in canonical.components() {
        if let std::path::Component::Normal(name) = component {
            base = base.join(name);
        }
    }
    base.join("lessonforge.log")
}

#[test]
fn test_default_logging_writes_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();

    let output = run_cli(&temp_dir, &workspace, &["list"]);
    assert!(
        output.status.success(),
        "lessonforge list should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );

    let log_path = expected_log_path(&temp_dir.path().join("state"), &workspace);
    assert!(
        log_path.exists(),
        "log file should exist at {}",
        log_path.display()
    );
    let content = fs::read_to_string(&log_path).unwrap();
    assert!(
        content.contains("Lessonforge CLI starting"),
        "log file should contain a startup message; got: {}",
        content.lines().next().unwrap_or("")
    );
}

#[test]
fn test_verbose_logging_mirrors_to_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();

    let output = run_cli(&temp_dir, &workspace, &["--verbose", "list"]);
    assert!(output.status.success());
    assert!(
        !String::from_utf8_lossy(&output.stderr).trim().is_empty(),
        "verbose mode should emit logs to stderr"
    );
}

#[test]
fn test_quiet_writes_no_log_file() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();

    let output = run_cli(&temp_dir, &workspace, &["--quiet", "list"]);
    assert!(output.status.success());
    let log_path = expected_log_path(&temp_dir.path().join("state"), &workspace);
    assert!(!log_path.exists());
}
