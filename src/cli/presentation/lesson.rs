//! Lesson presentation: record detail, listing and reconcile summaries.

use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

use super::{format_section_heading, to_pretty_json};
use crate::error::ApiError;
use crate::lesson::{LessonRecord, LessonStatus};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

fn styled_status(status: LessonStatus) -> String {
    match status {
        LessonStatus::Generating => status.as_str().yellow().to_string(),
        LessonStatus::Generated => status.as_str().green().to_string(),
        LessonStatus::Failed => status.as_str().red().to_string(),
    }
}

pub fn format_lesson_text(record: &LessonRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading(&record.title)));
    out.push_str(&format!("  Id:      {}\n", record.id));
    out.push_str(&format!("  Status:  {}\n", styled_status(record.status)));
    out.push_str(&format!("  Outline: {}\n", record.outline));
    out.push_str(&format!(
        "  Created: {}\n",
        record.created_at.format(TIMESTAMP_FORMAT)
    ));
    out.push_str(&format!(
        "  Updated: {}\n",
        record.updated_at.format(TIMESTAMP_FORMAT)
    ));
    if let Some(ref error) = record.error_message {
        out.push_str(&format!("  Error:   {}\n", error));
    }
    if let Some(ref content) = record.generated_content {
        out.push_str(&format!(
            "\n{}\n\n{}\n",
            format_section_heading("Generated component"),
            content
        ));
    }
    out
}

pub fn format_lesson_json(record: &LessonRecord) -> Result<String, ApiError> {
    to_pretty_json(record)
}

/// Render a single record in the requested `--format`.
pub fn format_lesson(record: &LessonRecord, format: &str) -> Result<String, ApiError> {
    if format == "json" {
        format_lesson_json(record)
    } else {
        Ok(format_lesson_text(record))
    }
}

pub fn format_lesson_list_text(records: &[LessonRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Lessons")));
    if records.is_empty() {
        out.push_str("No lessons yet.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Title", "Status", "Created"]);
    for record in records {
        table.add_row(vec![
            record.id.clone(),
            record.title.clone(),
            record.status.as_str().to_string(),
            record.created_at.format(TIMESTAMP_FORMAT).to_string(),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));

    let generated = records
        .iter()
        .filter(|r| r.status == LessonStatus::Generated)
        .count();
    let failed = records
        .iter()
        .filter(|r| r.status == LessonStatus::Failed)
        .count();
    out.push_str(&format!(
        "Total: {} lessons, {} generated, {} failed.\n",
        records.len(),
        generated,
        failed
    ));
    out
}

pub fn format_lesson_list_json(records: &[LessonRecord]) -> Result<String, ApiError> {
    to_pretty_json(records)
}

pub fn format_reconcile_result(failed_ids: &[String]) -> String {
    if failed_ids.is_empty() {
        return "No interrupted lessons found.".to_string();
    }
    let mut lines = vec![format!(
        "Marked {} interrupted lesson(s) as failed:",
        failed_ids.len()
    )];
    lines.extend(failed_ids.iter().map(|id| format!("  - {}", id)));
    lines.join("\n")
}
