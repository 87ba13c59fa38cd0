//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_check_result_json, format_check_result_text, format_lesson, format_lesson_list_json,
    format_lesson_list_text, format_reconcile_result,
};
use crate::config::{ConfigLoader, LessonforgeConfig};
use crate::error::{ApiError, StorageError};
use crate::generation::{validate, LessonGenerator};
use crate::lesson::{LessonOutline, LessonRecord, LessonService, LessonStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tracing::{info, info_span, warn};

/// A lesson whose generation job is running on the context runtime.
pub struct PendingLesson {
    service: LessonService,
    record: LessonRecord,
}

impl PendingLesson {
    /// The record as created, still `generating`.
    pub fn record(&self) -> &LessonRecord {
        &self.record
    }
}

/// Runtime context for CLI execution: workspace, loaded config, lesson service and
/// the tokio runtime that background generation jobs run on.
pub struct RunContext {
    workspace_root: PathBuf,
    config: LessonforgeConfig,
    store_path: PathBuf,
    service: LessonService,
    runtime: Runtime,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    /// Lessons left in `generating` by an earlier process are reconciled here.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::with_config(workspace_root, config)
    }

    pub fn with_config(workspace_root: PathBuf, config: LessonforgeConfig) -> Result<Self, ApiError> {
        config.generation.validate().map_err(ApiError::ConfigError)?;

        let store_path = config.system.storage.resolve_store_path(&workspace_root)?;
        std::fs::create_dir_all(&store_path).map_err(|e| ApiError::StorageError(StorageError::IoError(e)))?;
        let store = Arc::new(LessonStore::open(&store_path)?);

        let runtime = Runtime::new().map_err(|e| {
            ApiError::ConfigError(format!("Failed to create tokio runtime: {}", e))
        })?;

        let service = LessonService::new(store, config.generation.clone());
        let interrupted = service.reconcile_stale()?;
        if !interrupted.is_empty() {
            warn!(
                count = interrupted.len(),
                "Failed lessons interrupted by an earlier process"
            );
        }

        Ok(Self {
            workspace_root,
            config,
            store_path,
            service,
            runtime,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        let _span = info_span!("command", command = name).entered();

        let result = self.execute_inner(command);
        match &result {
            Ok(_) => info!(
                duration_ms = started.elapsed().as_millis() as u64,
                "Command finished"
            ),
            Err(e) => warn!(
                duration_ms = started.elapsed().as_millis() as u64,
                error = %e,
                "Command failed"
            ),
        }
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Generate { outline, format } => self.handle_generate(outline, format),
            Commands::Show { id, format } => format_lesson(&self.service.get_lesson(id)?, format),
            Commands::List { format } => {
                let records = self.service.list_lessons()?;
                if format == "json" {
                    format_lesson_list_json(&records)
                } else {
                    Ok(format_lesson_list_text(&records))
                }
            }
            Commands::Export { id, out } => {
                let content = self.service.export_content(id)?;
                if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| ApiError::StorageError(StorageError::IoError(e)))?;
                }
                std::fs::write(out, &content)
                    .map_err(|e| ApiError::StorageError(StorageError::IoError(e)))?;
                info!(lesson_id = %id, path = %out.display(), "Exported lesson component");
                Ok(format!("Wrote {} bytes to {}", content.len(), out.display()))
            }
            Commands::Check { file, format } => {
                let code = std::fs::read_to_string(file)
                    .map_err(|e| ApiError::StorageError(StorageError::IoError(e)))?;
                let result = validate(&code);
                if format == "json" {
                    format_check_result_json(file, &result)
                } else {
                    Ok(format_check_result_text(file, &result))
                }
            }
            Commands::Reconcile { older_than_secs } => {
                let threshold = older_than_secs
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| Duration::from_secs(self.config.generation.stale_after_secs));
                let failed = self.service.reconcile(threshold)?;
                Ok(format_reconcile_result(&failed))
            }
        }
    }

    fn handle_generate(&self, outline: &str, format: &str) -> Result<String, ApiError> {
        let pending = self.start_generation(outline)?;
        let record = self.finish_generation(pending)?;
        format_lesson(&record, format)
    }

    /// Store a `generating` record for `outline` and start its background job.
    /// Blank outlines and unusable provider config are rejected before any record exists.
    pub fn start_generation(&self, outline: &str) -> Result<PendingLesson, ApiError> {
        // Reject blank input before provider setup so no client is built for it.
        LessonOutline::parse(outline)?;

        if self.config.providers.is_empty() {
            return Err(ApiError::ProviderNotConfigured(
                "No providers configured; add a [providers.<name>] table".to_string(),
            ));
        }
        self.config.validate().map_err(|errors| {
            let problems: Vec<String> = errors.iter().map(ToString::to_string).collect();
            ApiError::ConfigError(problems.join("; "))
        })?;

        let generator = Arc::new(LessonGenerator::from_config(&self.config)?);
        let service = LessonService::new(self.service.store().clone(), self.config.generation.clone())
            .with_generator(generator);

        let record = {
            let _runtime = self.runtime.enter();
            service.create_lesson(outline)?
        };
        Ok(PendingLesson { service, record })
    }

    /// Block until the job of `pending` has written its terminal state.
    pub fn finish_generation(&self, pending: PendingLesson) -> Result<LessonRecord, ApiError> {
        info!(lesson_id = %pending.record.id, "Waiting for lesson generation");
        self.runtime
            .block_on(pending.service.wait_for(&pending.record.id))
    }
}
