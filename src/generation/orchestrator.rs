//! Lesson generation orchestrator.
//!
//! Runs a bounded number of attempts. Each attempt extracts a title, generates
//! component code, validates it and, when attempts remain, makes a single repair
//! call. The result is always terminal: generated content or a failure message.

use crate::config::{GenerationSettings, LessonforgeConfig};
use crate::error::ApiError;
use crate::generation::model::{LessonModel, ProviderModel};
use crate::generation::prompts::{code_prompt, repair_prompt, strip_code_fences, title_prompt};
use crate::generation::validator::{validate, ValidationResult};
use crate::lesson::LessonOutline;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};

/// Code produced within one attempt, with its verdict.
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    pub attempt_number: u32,
    pub outline: LessonOutline,
    pub produced_code: String,
    pub validation: ValidationResult,
}

/// Terminal outcome of [`LessonGenerator::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GenerationResult {
    Generated { title: String, code: String },
    Failed { error: String },
}

enum AttemptVerdict {
    Accepted { title: String, code: String },
    Rejected(GenerationAttempt),
}

pub struct LessonGenerator {
    title_model: Arc<dyn LessonModel>,
    code_model: Arc<dyn LessonModel>,
    settings: GenerationSettings,
}

impl LessonGenerator {
    pub fn new(
        title_model: Arc<dyn LessonModel>,
        code_model: Arc<dyn LessonModel>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            title_model,
            code_model,
            settings,
        }
    }

    /// One model for both title and code.
    pub fn with_model(model: Arc<dyn LessonModel>, settings: GenerationSettings) -> Self {
        Self::new(model.clone(), model, settings)
    }

    /// Build provider-backed models for the configured title and code providers.
    pub fn from_config(config: &LessonforgeConfig) -> Result<Self, ApiError> {
        let settings = config.generation.clone();
        let build = |name: &str| -> Result<Arc<dyn LessonModel>, ApiError> {
            let provider = config.providers.get(name).ok_or_else(|| {
                ApiError::ProviderNotConfigured(format!(
                    "Provider '{}' is not defined under [providers]",
                    name
                ))
            })?;
            Ok(Arc::new(ProviderModel::from_config(provider)?))
        };

        let title_model = build(&settings.title_provider)?;
        let code_model = if settings.code_provider == settings.title_provider {
            title_model.clone()
        } else {
            build(&settings.code_provider)?
        };
        Ok(Self::new(title_model, code_model, settings))
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Produce title and validated code for an outline. Never returns an error:
    /// every failure path ends in [`GenerationResult::Failed`].
    pub async fn generate(&self, outline: &LessonOutline) -> GenerationResult {
        let max_attempts = self.settings.max_attempts.max(1);
        let span = info_span!("generate_lesson", max_attempts);

        async move {
            let mut attempt = 1;
            loop {
                let is_last = attempt >= max_attempts;
                match self.run_attempt(outline, attempt, max_attempts).await {
                    Ok(AttemptVerdict::Accepted { title, code }) => {
                        info!(attempt, title = %title, "Lesson code accepted");
                        return GenerationResult::Generated { title, code };
                    }
                    Ok(AttemptVerdict::Rejected(rejected)) => {
                        let summary = rejected.validation.summary();
                        warn!(
                            attempt = rejected.attempt_number,
                            errors = %summary,
                            "Generated code failed validation"
                        );
                        if is_last {
                            return GenerationResult::Failed {
                                error: format!(
                                    "Code validation failed after {} attempts: {}",
                                    max_attempts, summary
                                ),
                            };
                        }
                    }
                    Err(err) => {
                        warn!(attempt, error = %err, "Generation attempt failed");
                        if is_last {
                            return GenerationResult::Failed {
                                error: err.to_string(),
                            };
                        }
                    }
                }
                attempt += 1;
            }
        }
        .instrument(span)
        .await
    }

    async fn run_attempt(
        &self,
        outline: &LessonOutline,
        attempt: u32,
        max_attempts: u32,
    ) -> Result<AttemptVerdict, ApiError> {
        let title = self.extract_title(outline).await?;
        let code = self.generate_code(outline, attempt).await?;

        let generated = GenerationAttempt {
            attempt_number: attempt,
            outline: outline.clone(),
            validation: validate(&code),
            produced_code: code,
        };
        if generated.validation.is_valid {
            return Ok(AttemptVerdict::Accepted {
                title,
                code: generated.produced_code,
            });
        }
        if attempt >= max_attempts {
            return Ok(AttemptVerdict::Rejected(generated));
        }

        let repaired = self.validate_and_repair(generated).await?;
        if repaired.validation.is_valid {
            Ok(AttemptVerdict::Accepted {
                title,
                code: repaired.produced_code,
            })
        } else {
            Ok(AttemptVerdict::Rejected(repaired))
        }
    }

    async fn extract_title(&self, outline: &LessonOutline) -> Result<String, ApiError> {
        let prompt = title_prompt(outline.as_str(), self.settings.title_max_chars);
        let raw = self
            .title_model
            .complete(&prompt)
            .instrument(info_span!("extract_title"))
            .await?;

        let title = strip_code_fences(&raw);
        if title.is_empty() {
            debug!("Model returned an empty title, using fallback");
            Ok(self.settings.fallback_title.clone())
        } else {
            Ok(title)
        }
    }

    async fn generate_code(&self, outline: &LessonOutline, attempt: u32) -> Result<String, ApiError> {
        let prompt = code_prompt(outline.as_str(), attempt);
        let raw = self
            .code_model
            .complete(&prompt)
            .instrument(info_span!("generate_lesson_code", attempt))
            .await?;
        Ok(strip_code_fences(&raw))
    }

    async fn validate_and_repair(
        &self,
        rejected: GenerationAttempt,
    ) -> Result<GenerationAttempt, ApiError> {
        debug!(
            attempt = rejected.attempt_number,
            outline_chars = rejected.outline.as_str().len(),
            errors = %rejected.validation.summary(),
            "Requesting repair"
        );
        let prompt = repair_prompt(&rejected.produced_code, &rejected.validation.errors);
        let raw = self
            .code_model
            .complete(&prompt)
            .instrument(info_span!("validate_and_repair", attempt = rejected.attempt_number))
            .await?;

        let code = strip_code_fences(&raw);
        Ok(GenerationAttempt {
            attempt_number: rejected.attempt_number,
            outline: rejected.outline,
            validation: validate(&code),
            produced_code: code,
        })
    }
}
