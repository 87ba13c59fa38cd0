//! Lesson service: trigger, lookup, listing, export and reconciliation.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::config::GenerationSettings;
use crate::error::ApiError;
use crate::generation::LessonGenerator;
use crate::lesson::jobs::GenerationJobs;
use crate::lesson::record::{LessonOutline, LessonRecord, LessonStatus};
use crate::lesson::store::LessonStore;

/// Error recorded on lessons whose generation never reported back.
pub const INTERRUPTED_MESSAGE: &str = "Generation interrupted before completion";

pub struct LessonService {
    store: Arc<LessonStore>,
    generator: Option<Arc<LessonGenerator>>,
    jobs: GenerationJobs,
    settings: GenerationSettings,
}

impl LessonService {
    /// Read-only service; `create_lesson` needs [`LessonService::with_generator`].
    pub fn new(store: Arc<LessonStore>, settings: GenerationSettings) -> Self {
        Self {
            store,
            generator: None,
            jobs: GenerationJobs::new(),
            settings,
        }
    }

    pub fn with_generator(mut self, generator: Arc<LessonGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn store(&self) -> &Arc<LessonStore> {
        &self.store
    }

    /// Validate the outline, store a `generating` record and start generation in
    /// the background. Returns as soon as the record exists.
    pub fn create_lesson(&self, raw_outline: &str) -> Result<LessonRecord, ApiError> {
        let outline = LessonOutline::parse(raw_outline)?;
        let generator = self.generator.clone().ok_or_else(|| {
            ApiError::ProviderNotConfigured("No generation model configured".to_string())
        })?;

        let runtime = Handle::try_current().map_err(|e| {
            ApiError::GenerationFailed(format!("No async runtime to run generation on: {}", e))
        })?;

        let record = LessonRecord::new_generating(&outline, &self.settings.placeholder_title);
        self.store.insert(&record)?;

        self.jobs.spawn(
            &runtime,
            record.id.clone(),
            outline,
            self.store.clone(),
            generator,
        );
        info!(
            lesson_id = %record.id,
            active_jobs = self.jobs.active_count(),
            "Lesson created, generation started"
        );
        Ok(record)
    }

    pub fn get_lesson(&self, id: &str) -> Result<LessonRecord, ApiError> {
        self.store
            .get(id)?
            .ok_or_else(|| ApiError::LessonNotFound(id.to_string()))
    }

    pub fn list_lessons(&self) -> Result<Vec<LessonRecord>, ApiError> {
        Ok(self.store.list()?)
    }

    /// Wait for the background job of `id` and return the record afterwards.
    pub async fn wait_for(&self, id: &str) -> Result<LessonRecord, ApiError> {
        self.jobs.wait(id).await?;
        self.get_lesson(id)
    }

    pub async fn wait_all(&self) -> Result<(), ApiError> {
        self.jobs.wait_all().await
    }

    /// Generated content of a finished lesson, for the external renderer.
    pub fn export_content(&self, id: &str) -> Result<String, ApiError> {
        let record = self.get_lesson(id)?;
        match (record.status, record.generated_content) {
            (LessonStatus::Generated, Some(content)) => Ok(content),
            _ => Err(ApiError::LessonNotGenerated(id.to_string())),
        }
    }

    /// Fail records stuck in `generating` for longer than `older_than`.
    /// Jobs still running in this process are left alone.
    pub fn reconcile(&self, older_than: Duration) -> Result<Vec<String>, ApiError> {
        let age = chrono::Duration::from_std(older_than)
            .map_err(|e| ApiError::ConfigError(format!("Invalid reconcile threshold: {}", e)))?;
        let cutoff = Utc::now() - age;

        let failed = self
            .store
            .fail_stale(cutoff, INTERRUPTED_MESSAGE, |id| self.jobs.is_active(id))?;
        if !failed.is_empty() {
            warn!(count = failed.len(), "Marked interrupted lessons as failed");
        }
        Ok(failed)
    }

    /// Reconcile with the configured staleness threshold.
    pub fn reconcile_stale(&self) -> Result<Vec<String>, ApiError> {
        self.reconcile(Duration::from_secs(self.settings.stale_after_secs))
    }
}
