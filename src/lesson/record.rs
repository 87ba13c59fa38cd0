//! Lesson record data model.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::generation::GenerationResult;

static LESSON_COUNTER: AtomicU64 = AtomicU64::new(1);

/// User-supplied outline, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonOutline(String);

impl LessonOutline {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ApiError::InvalidOutline);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    Generating,
    Generated,
    Failed,
}

impl LessonStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LessonStatus::Generating => "generating",
            LessonStatus::Generated => "generated",
            LessonStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, LessonStatus::Generating)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRecord {
    pub id: String,
    pub title: String,
    pub outline: String,
    pub status: LessonStatus,
    pub generated_content: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LessonRecord {
    /// Fresh record in `generating` state with a placeholder title.
    pub fn new_generating(outline: &LessonOutline, placeholder_title: &str) -> Self {
        let now = Utc::now();
        Self {
            id: new_lesson_id(),
            title: placeholder_title.to_string(),
            outline: outline.as_str().to_string(),
            status: LessonStatus::Generating,
            generated_content: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy of this record carrying the orchestrator's terminal result.
    pub fn completed(&self, result: &GenerationResult, at: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.updated_at = at;
        match result {
            GenerationResult::Generated { title, code } => {
                next.status = LessonStatus::Generated;
                next.title = title.clone();
                next.generated_content = Some(code.clone());
                next.error_message = None;
            }
            GenerationResult::Failed { error } => {
                next.status = LessonStatus::Failed;
                next.error_message = Some(error.clone());
            }
        }
        next
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub fn new_lesson_id() -> String {
    let ts = now_millis();
    let pid = std::process::id();
    let seq = LESSON_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("lesson-{ts}-{pid}-{seq}")
}
