//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INVALID_INPUT: i32 = 2;
pub const EXIT_NOT_FOUND: i32 = 3;
pub const EXIT_NOT_READY: i32 = 4;
/// `generate` finished, but the lesson ended in `failed`.
pub const EXIT_LESSON_FAILED: i32 = 5;
pub const EXIT_CONFIG: i32 = 78;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::InvalidOutline => format!("error: {}", e),
        ApiError::LessonNotFound(id) => format!("error: no lesson with id '{}'", id),
        ApiError::ProviderNotConfigured(_) | ApiError::ConfigError(_) => {
            format!("configuration error: {}", e)
        }
        _ => e.to_string(),
    }
}

/// Process exit status for a command that failed with `e`.
pub fn exit_code(e: &ApiError) -> i32 {
    match e {
        ApiError::InvalidOutline => EXIT_INVALID_INPUT,
        ApiError::LessonNotFound(_) => EXIT_NOT_FOUND,
        ApiError::LessonNotGenerated(_) | ApiError::LessonAlreadyCompleted(_) => EXIT_NOT_READY,
        ApiError::ProviderNotConfigured(_) | ApiError::ConfigError(_) => EXIT_CONFIG,
        _ => EXIT_FAILURE,
    }
}
