//! CLI binary tests for the commands that need no model provider.

use crate::integration::test_utils::{run_cli, VALID_COMPONENT};
use std::fs;
use tempfile::TempDir;

fn workspace(test_dir: &TempDir) -> std::path::PathBuf {
    let ws = test_dir.path().join("ws");
    fs::create_dir_all(&ws).unwrap();
    ws
}

#[test]
fn list_on_fresh_workspace_is_empty() {
    let test_dir = TempDir::new().unwrap();
    let ws = workspace(&test_dir);

    let output = run_cli(&test_dir, &ws, &["list", "--format", "json"]);
    assert!(
        output.status.success(),
        "list should succeed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "[]");
    assert!(ws.join(".lessonforge/store").exists());
}

#[test]
fn show_unknown_lesson_fails() {
    let test_dir = TempDir::new().unwrap();
    let ws = workspace(&test_dir);

    let output = run_cli(&test_dir, &ws, &["show", "lesson-0-0-0"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no lesson with id 'lesson-0-0-0'"));
}

#[test]
fn generate_blank_outline_is_rejected() {
    let test_dir = TempDir::new().unwrap();
    let ws = workspace(&test_dir);

    let output = run_cli(&test_dir, &ws, &["generate", "   "]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Lesson outline is required"));

    let listed = run_cli(&test_dir, &ws, &["list", "--format", "json"]);
    assert_eq!(String::from_utf8_lossy(&listed.stdout).trim(), "[]");
}

#[test]
fn check_passes_valid_component() {
    let test_dir = TempDir::new().unwrap();
    let ws = workspace(&test_dir);
    let file = ws.join("lesson.tsx");
    fs::write(&file, VALID_COMPONENT).unwrap();

    let output = run_cli(&test_dir, &ws, &["check", file.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("all checks passed"));
}

#[test]
fn check_reports_unsupported_import() {
    let test_dir = TempDir::new().unwrap();
    let ws = workspace(&test_dir);
    let file = ws.join("lesson.tsx");
    fs::write(
        &file,
        format!("import _ from \"lodash\";\n{}", VALID_COMPONENT),
    )
    .unwrap();

    let output = run_cli(
        &test_dir,
        &ws,
        &["check", file.to_str().unwrap(), "--format", "json"],
    );
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["is_valid"], false);
    assert_eq!(value["errors"][0]["code"], "unsupported_import");
}

#[test]
fn reconcile_on_clean_store_reports_nothing() {
    let test_dir = TempDir::new().unwrap();
    let ws = workspace(&test_dir);

    let output = run_cli(&test_dir, &ws, &["reconcile", "--older-than-secs", "0"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No interrupted lessons found."));
}
