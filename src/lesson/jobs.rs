//! Background generation jobs.
//!
//! Each job is a supervisor task wrapping an inner generation task. The
//! supervisor always writes a terminal state, even when the inner task panics
//! or is cancelled.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, warn, Instrument};

use crate::error::ApiError;
use crate::generation::{GenerationResult, LessonGenerator};
use crate::lesson::record::LessonOutline;
use crate::lesson::store::LessonStore;

#[derive(Default)]
pub struct GenerationJobs {
    handles: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl GenerationJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start generation on `runtime` for a record already stored in
    /// `generating` state.
    pub fn spawn(
        &self,
        runtime: &Handle,
        lesson_id: String,
        outline: LessonOutline,
        store: Arc<LessonStore>,
        generator: Arc<LessonGenerator>,
    ) {
        let span = info_span!("lesson_job", lesson_id = %lesson_id);
        let id = lesson_id.clone();

        let supervisor = runtime.spawn(
            async move {
                let worker = tokio::spawn(
                    async move { generator.generate(&outline).await }.in_current_span(),
                );

                let result = match worker.await {
                    Ok(result) => result,
                    Err(join_err) => {
                        error!(error = %join_err, "Generation task aborted");
                        GenerationResult::Failed {
                            error: format!("Generation task aborted: {}", join_err),
                        }
                    }
                };

                match store.complete(&id, &result, Utc::now()) {
                    Ok(record) => info!(status = record.status.as_str(), "Lesson generation finished"),
                    Err(ApiError::LessonAlreadyCompleted(_)) => {
                        warn!("Lesson reached a terminal state before this job finished")
                    }
                    Err(err) => error!(error = %err, "Failed to persist generation result"),
                }
            }
            .instrument(span),
        );

        let mut handles = self.handles.lock();
        handles.retain(|_, handle| !handle.is_finished());
        handles.insert(lesson_id, supervisor);
    }

    /// Whether a job for `lesson_id` is tracked and still running.
    pub fn is_active(&self, lesson_id: &str) -> bool {
        self.handles
            .lock()
            .get(lesson_id)
            .map_or(false, |handle| !handle.is_finished())
    }

    pub fn active_count(&self) -> usize {
        self.handles
            .lock()
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Wait for the job of `lesson_id`. Unknown ids return immediately.
    pub async fn wait(&self, lesson_id: &str) -> Result<(), ApiError> {
        let handle = self.handles.lock().remove(lesson_id);
        match handle {
            Some(handle) => handle.await.map_err(|e| {
                ApiError::GenerationFailed(format!("Job supervisor for {} failed: {}", lesson_id, e))
            }),
            None => Ok(()),
        }
    }

    pub async fn wait_all(&self) -> Result<(), ApiError> {
        let handles: Vec<(String, JoinHandle<()>)> = self.handles.lock().drain().collect();
        for (lesson_id, handle) in handles {
            handle.await.map_err(|e| {
                ApiError::GenerationFailed(format!("Job supervisor for {} failed: {}", lesson_id, e))
            })?;
        }
        Ok(())
    }
}
