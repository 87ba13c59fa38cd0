//! CLI presentation: text and json formatters per command family.

mod check;
mod lesson;

use crate::error::{ApiError, StorageError};
use owo_colors::OwoColorize;
use serde::Serialize;

pub use check::{format_check_result_json, format_check_result_text};
pub use lesson::{
    format_lesson, format_lesson_json, format_lesson_list_json, format_lesson_list_text, format_lesson_text,
    format_reconcile_result,
};

/// Section heading with bold/underline styling.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::StorageError(StorageError::Serialization(e.to_string())))
}
