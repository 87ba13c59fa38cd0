//! CLI parse: clap types for lessonforge. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lessonforge CLI - generate interactive lesson components from outlines
#[derive(Parser)]
#[command(name = "lessonforge")]
#[command(about = "Generate validated interactive lesson components from short outlines")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a lesson from an outline and wait for generation to finish
    Generate {
        /// Natural-language lesson outline
        outline: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show one lesson record
    Show {
        /// Lesson id
        id: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List lessons, newest first
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Write the generated component of a lesson to a file
    Export {
        /// Lesson id
        id: String,
        /// Destination file
        #[arg(long)]
        out: PathBuf,
    },
    /// Run the structural validator on a local component file
    Check {
        /// Component source file
        file: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Fail lessons stuck in generating state
    Reconcile {
        /// Age threshold in seconds (default: generation.stale_after_secs)
        #[arg(long)]
        older_than_secs: Option<u64>,
    },
}
