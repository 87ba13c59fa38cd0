//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("system.storage.store_path", ".lessonforge/store")?
        .set_default("generation.max_attempts", 3i64)?
        .set_default("generation.title_max_chars", 60i64)?
        .set_default("generation.fallback_title", "Untitled Lesson")?
        .set_default("generation.placeholder_title", "Generating...")?
        .set_default("generation.stale_after_secs", 900i64)
}
