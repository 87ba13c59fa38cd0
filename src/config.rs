//! Configuration System
//!
//! Layered configuration for providers, generation settings, storage and logging.
//! Sources merge from built-in defaults up through global and workspace TOML files
//! to `LESSONFORGE__*` environment variables.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use crate::provider::{ProviderConfig, ProviderType};

mod facade;
mod merge;
mod sources;
mod workspace;

pub use facade::ConfigLoader;
pub use workspace::StorageConfig;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LessonforgeConfig {
    /// Model provider configurations, keyed by provider name
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Generation pipeline settings
    #[serde(default)]
    pub generation: GenerationSettings,

    /// System-wide settings
    #[serde(default)]
    pub system: SystemConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings consumed by the generation orchestrator and lesson service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Provider used for title extraction
    #[serde(default = "default_provider_name")]
    pub title_provider: String,

    /// Provider used for code generation and repair
    #[serde(default = "default_provider_name")]
    pub code_provider: String,

    /// Retry ceiling: outer generation attempts before terminal failure
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Length guidance given to the model for titles
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,

    /// Title used when the model answers with blank text
    #[serde(default = "default_fallback_title")]
    pub fallback_title: String,

    /// Title stored on a record while generation is running
    #[serde(default = "default_placeholder_title")]
    pub placeholder_title: String,

    /// Age after which a record stuck in `generating` is failed by reconciliation
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,
}

fn default_provider_name() -> String {
    "default".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_title_max_chars() -> usize {
    60
}

fn default_fallback_title() -> String {
    "Untitled Lesson".to_string()
}

fn default_placeholder_title() -> String {
    "Generating...".to_string()
}

fn default_stale_after_secs() -> u64 {
    15 * 60
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            title_provider: default_provider_name(),
            code_provider: default_provider_name(),
            max_attempts: default_max_attempts(),
            title_max_chars: default_title_max_chars(),
            fallback_title: default_fallback_title(),
            placeholder_title: default_placeholder_title(),
            stale_after_secs: default_stale_after_secs(),
        }
    }
}

/// System-wide configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Storage paths
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Provider(String, String),
    Generation(String),
    System(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Provider(name, msg) => write!(f, "Provider '{}': {}", name, msg),
            ValidationError::Generation(msg) => write!(f, "Generation: {}", msg),
            ValidationError::System(msg) => write!(f, "System: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl GenerationSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be at least 1".to_string());
        }
        if self.title_max_chars == 0 {
            return Err("title_max_chars must be at least 1".to_string());
        }
        if self.fallback_title.trim().is_empty() {
            return Err("fallback_title cannot be blank".to_string());
        }
        Ok(())
    }
}

impl LessonforgeConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for (name, provider) in &self.providers {
            if let Err(e) = provider.validate() {
                errors.push(ValidationError::Provider(name.clone(), e));
            }
        }

        if let Err(e) = self.generation.validate() {
            errors.push(ValidationError::Generation(e));
        }
        for (role, provider_name) in [
            ("title_provider", &self.generation.title_provider),
            ("code_provider", &self.generation.code_provider),
        ] {
            if !self.providers.contains_key(provider_name) {
                errors.push(ValidationError::Generation(format!(
                    "{} refers to unknown provider '{}'",
                    role, provider_name
                )));
            }
        }

        if self.system.storage.store_path.as_os_str().is_empty() {
            errors.push(ValidationError::System(
                "Store path cannot be empty".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
