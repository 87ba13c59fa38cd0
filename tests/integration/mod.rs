//! Integration tests for lessonforge

mod cli_commands;
mod config_integration;
mod lesson_lifecycle;
mod logging_default;
mod test_utils;
