//! Config sources, lowest precedence first: global file, workspace files, environment.

pub mod global_file;
pub mod workspace_file;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment};

/// `LESSONFORGE__GENERATION__MAX_ATTEMPTS=5` overrides `generation.max_attempts`.
pub fn add_environment(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix("LESSONFORGE")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    ))
}
