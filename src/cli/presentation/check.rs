//! Validator verdict presentation for `check`.

use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

use super::to_pretty_json;
use crate::error::ApiError;
use crate::generation::ValidationResult;

pub fn format_check_result_text(path: &Path, result: &ValidationResult) -> String {
    if result.is_valid {
        return format!("{} {}: all checks passed", "PASS".green(), path.display());
    }
    let mut out = format!(
        "{} {}: {} problem(s)",
        "FAIL".red(),
        path.display(),
        result.errors.len()
    );
    for issue in &result.errors {
        out.push_str(&format!("\n  - [{}] {}", issue.code(), issue.message()));
    }
    out
}

pub fn format_check_result_json(path: &Path, result: &ValidationResult) -> Result<String, ApiError> {
    let errors: Vec<serde_json::Value> = result
        .errors
        .iter()
        .map(|issue| json!({ "code": issue.code(), "message": issue.message() }))
        .collect();
    to_pretty_json(&json!({
        "file": path.display().to_string(),
        "is_valid": result.is_valid,
        "errors": errors,
    }))
}
