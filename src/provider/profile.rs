//! Provider profile: the config-file shape of a provider and its conversion to a client.

use crate::error::ApiError;
use crate::provider::{CompletionOptions, ModelProvider};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderType {
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
    #[serde(rename = "local")]
    LocalCustom,
}

/// Environment variable consulted when a hosted provider has no `api_key` in config.
pub fn required_api_key_env_var(provider_type: ProviderType) -> Option<&'static str> {
    match provider_type {
        ProviderType::OpenAI => Some("OPENAI_API_KEY"),
        ProviderType::Anthropic => Some("ANTHROPIC_API_KEY"),
        ProviderType::Gemini => Some("GEMINI_API_KEY"),
        ProviderType::Ollama | ProviderType::LocalCustom => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Filled from the config table key when absent
    #[serde(default)]
    pub provider_name: Option<String>,
    pub provider_type: ProviderType,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub default_options: CompletionOptions,
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model name cannot be empty".to_string());
        }
        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(format!(
                    "Endpoint must be an http(s) URL, got '{}'",
                    endpoint
                ));
            }
        }
        if self.provider_type == ProviderType::LocalCustom && self.endpoint.is_none() {
            return Err("Local providers require an endpoint".to_string());
        }
        if let Some(var) = required_api_key_env_var(self.provider_type) {
            if self.resolve_api_key().is_none() {
                return Err(format!("No API key; set api_key or {}", var));
            }
        }
        if let Some(temp) = self.default_options.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(format!("Temperature must be within 0.0-2.0, got {}", temp));
            }
        }
        Ok(())
    }

    /// Resolve the API key: config value first, then the provider's env var.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                required_api_key_env_var(self.provider_type)
                    .and_then(|var| std::env::var(var).ok())
                    .filter(|key| !key.trim().is_empty())
            })
    }

    pub fn to_model_provider(&self) -> Result<ModelProvider, ApiError> {
        let missing_key = || {
            let name = self.provider_name.as_deref().unwrap_or("unknown");
            let hint = required_api_key_env_var(self.provider_type).unwrap_or("api_key");
            ApiError::ProviderNotConfigured(format!(
                "Provider '{}' has no API key; set api_key or {}",
                name, hint
            ))
        };

        let model = self.model.clone();
        match self.provider_type {
            ProviderType::OpenAI => Ok(ModelProvider::OpenAI {
                model,
                api_key: self.resolve_api_key().ok_or_else(missing_key)?,
                base_url: self.endpoint.clone(),
            }),
            ProviderType::Anthropic => Ok(ModelProvider::Anthropic {
                model,
                api_key: self.resolve_api_key().ok_or_else(missing_key)?,
            }),
            ProviderType::Gemini => Ok(ModelProvider::Gemini {
                model,
                api_key: self.resolve_api_key().ok_or_else(missing_key)?,
                base_url: self.endpoint.clone(),
            }),
            ProviderType::Ollama => Ok(ModelProvider::Ollama {
                model,
                base_url: self.endpoint.clone(),
            }),
            ProviderType::LocalCustom => Ok(ModelProvider::LocalCustom {
                model,
                endpoint: self.endpoint.clone().ok_or_else(|| {
                    ApiError::ProviderNotConfigured(
                        "Local providers require an endpoint".to_string(),
                    )
                })?,
                api_key: self.api_key.clone(),
            }),
        }
    }
}
