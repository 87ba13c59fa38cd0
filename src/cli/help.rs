//! CLI command-name contract for logging.

use crate::cli::parse::Commands;

/// Stable command name recorded on the command span (e.g. "generate", "reconcile").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Generate { .. } => "generate",
        Commands::Show { .. } => "show",
        Commands::List { .. } => "list",
        Commands::Export { .. } => "export",
        Commands::Check { .. } => "check",
        Commands::Reconcile { .. } => "reconcile",
    }
}
