//! Lessonforge CLI Binary
//!
//! Turns lesson outlines into validated interactive components. `generate`
//! reports the new lesson id on stderr as soon as the record exists, then waits
//! for the background job and prints the finished record.

use clap::Parser;
use lessonforge::cli::{
    command_name, exit_code, format_lesson, map_error, Cli, Commands, RunContext,
    EXIT_LESSON_FAILED,
};
use lessonforge::config::ConfigLoader;
use lessonforge::error::ApiError;
use lessonforge::lesson::{LessonRecord, LessonStatus};
use lessonforge::logging::{init_logging, resolve_log_file_path, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!(command = command_name(&cli.command), "Lessonforge CLI starting");

    let status = match run(&cli) {
        Ok(status) => status,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("{}", map_error(&e));
            exit_code(&e)
        }
    };
    process::exit(status);
}

/// Run the parsed command and return the process exit status.
fn run(cli: &Cli) -> Result<i32, ApiError> {
    let context = RunContext::new(cli.workspace.clone(), cli.config.clone())?;

    match &cli.command {
        Commands::Generate { outline, format } => {
            let pending = context.start_generation(outline)?;
            eprintln!("Started lesson {}", pending.record().id);

            let record = context.finish_generation(pending)?;
            println!("{}", format_lesson(&record, format)?);
            Ok(generation_exit_status(&record))
        }
        command => {
            println!("{}", context.execute(command)?);
            Ok(0)
        }
    }
}

/// A lesson that ended in `failed` makes `generate` exit non-zero.
fn generation_exit_status(record: &LessonRecord) -> i32 {
    match record.status {
        LessonStatus::Failed => EXIT_LESSON_FAILED,
        LessonStatus::Generated | LessonStatus::Generating => 0,
    }
}

/// Logging settings: CLI flags over the loaded config's `[logging]` table over defaults.
/// A config that fails to load still gets default logging; `run` reports the error.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let loaded = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(&cli.workspace),
    };
    let mut config = loaded.map(|c| c.logging).unwrap_or_default();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
        if config.output == "file" {
            config.output = "file+stderr".to_string();
        }
    }
    config.level = cli.log_level.clone().unwrap_or(config.level);
    config.format = cli.log_format.clone().unwrap_or(config.format);
    config.output = cli.log_output.clone().unwrap_or(config.output);

    if config.enabled && config.output.starts_with("file") {
        if let Ok(path) = resolve_log_file_path(
            cli.log_file.clone(),
            config.file.clone(),
            Some(cli.workspace.as_path()),
        ) {
            config.file = Some(path);
        }
    } else if cli.log_file.is_some() {
        config.file = cli.log_file.clone();
    }

    config
}
