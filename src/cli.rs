//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{
    exit_code, map_error, EXIT_CONFIG, EXIT_FAILURE, EXIT_INVALID_INPUT, EXIT_LESSON_FAILED,
    EXIT_NOT_FOUND, EXIT_NOT_READY,
};
pub use parse::{Cli, Commands};
pub use presentation::{
    format_check_result_json, format_check_result_text, format_lesson, format_lesson_json,
    format_lesson_list_json, format_lesson_list_text, format_lesson_text,
    format_reconcile_result, format_section_heading,
};
pub use route::{PendingLesson, RunContext};
