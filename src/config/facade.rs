//! Config loading facade: one entry point for CLI and library callers.

use crate::config::merge::merge_policy;
use crate::config::sources::{self, global_file, workspace_file};
use crate::config::LessonforgeConfig;
use crate::error::ApiError;
use config::{Config, File};
use std::path::Path;

/// Loads `LessonforgeConfig` from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Order (later wins): built-in defaults, global file, workspace
    /// `config/config.toml`, workspace `config/{LESSONFORGE_ENV}.toml`, then
    /// `LESSONFORGE__*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<LessonforgeConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = sources::add_environment(builder)?;
        Self::finish(builder.build()?)
    }

    /// Load configuration from an explicit file; file discovery is skipped.
    pub fn load_from_file(path: &Path) -> Result<LessonforgeConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?.add_source(File::from(path));
        let builder = sources::add_environment(builder)?;
        Self::finish(builder.build()?)
    }

    fn finish(config: Config) -> Result<LessonforgeConfig, ApiError> {
        let mut parsed: LessonforgeConfig = config.try_deserialize()?;
        for (name, provider) in parsed.providers.iter_mut() {
            if provider.provider_name.is_none() {
                provider.provider_name = Some(name.clone());
            }
        }
        Ok(parsed)
    }
}
