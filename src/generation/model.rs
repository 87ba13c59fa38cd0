//! Text-completion seam used by the generation pipeline.

use crate::error::ApiError;
use crate::provider::{
    ChatMessage, CompletionOptions, ModelProviderClient, ProviderConfig, ProviderFactory,
};
use async_trait::async_trait;
use tracing::debug;

/// Prompt in, text out. Implementations must be usable across tasks.
#[async_trait]
pub trait LessonModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ApiError>;
}

/// [`LessonModel`] backed by a configured provider client.
pub struct ProviderModel {
    client: Box<dyn ModelProviderClient>,
    options: CompletionOptions,
}

impl ProviderModel {
    pub fn new(client: Box<dyn ModelProviderClient>, options: CompletionOptions) -> Self {
        Self { client, options }
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, ApiError> {
        let provider = config.to_model_provider()?;
        config.validate().map_err(ApiError::ConfigError)?;
        let client = ProviderFactory::create_client(&provider)?;
        Ok(Self::new(client, config.default_options.clone()))
    }

    pub fn provider_name(&self) -> &str {
        self.client.provider_name()
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }
}

#[async_trait]
impl LessonModel for ProviderModel {
    async fn complete(&self, prompt: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .complete(vec![ChatMessage::user(prompt)], self.options.clone())
            .await?;

        debug!(
            provider = self.client.provider_name(),
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
            "Model completion received"
        );

        Ok(response.content)
    }
}
