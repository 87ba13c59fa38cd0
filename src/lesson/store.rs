//! Durable sled-backed lesson record store.

use std::io;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sled::{Db, IVec, Tree};

use crate::error::{ApiError, StorageError};
use crate::generation::GenerationResult;
use crate::lesson::record::{LessonRecord, LessonStatus};

const TREE_LESSONS: &str = "lessons";

#[derive(Clone)]
pub struct LessonStore {
    db: Db,
    lessons: Tree,
}

impl LessonStore {
    pub fn new(db: Db) -> Result<Self, StorageError> {
        let lessons = db.open_tree(TREE_LESSONS).map_err(to_storage_io)?;
        Ok(Self { db, lessons })
    }

    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = sled::open(path).map_err(to_storage_io)?;
        Self::new(db)
    }

    pub fn shared(db: Db) -> Result<Arc<Self>, StorageError> {
        Ok(Arc::new(Self::new(db)?))
    }

    /// Insert a new record. Ids are never overwritten.
    pub fn insert(&self, record: &LessonRecord) -> Result<(), StorageError> {
        let value = serde_json::to_vec(record).map_err(to_storage_data)?;
        self.lessons
            .compare_and_swap(record.id.as_bytes(), None as Option<&[u8]>, Some(value))
            .map_err(to_storage_io)?
            .map_err(|_| {
                StorageError::IoError(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("lesson id already exists: {}", record.id),
                ))
            })?;
        self.flush()
    }

    pub fn get(&self, id: &str) -> Result<Option<LessonRecord>, StorageError> {
        let Some(raw) = self.lessons.get(id.as_bytes()).map_err(to_storage_io)? else {
            return Ok(None);
        };
        Ok(Some(decode(&raw)?))
    }

    /// All records, newest first.
    pub fn list(&self) -> Result<Vec<LessonRecord>, StorageError> {
        let mut out = Vec::new();
        for result in self.lessons.iter() {
            let (_, value) = result.map_err(to_storage_io)?;
            out.push(decode(&value)?);
        }
        out.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| id_sequence(&b.id).cmp(&id_sequence(&a.id)))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(out)
    }

    /// Apply a terminal result to a `generating` record, exactly once.
    ///
    /// Implemented as a compare-and-swap loop so a concurrent writer can never
    /// overwrite a terminal state.
    pub fn complete(
        &self,
        id: &str,
        result: &GenerationResult,
        at: DateTime<Utc>,
    ) -> Result<LessonRecord, ApiError> {
        loop {
            let Some(raw) = self.lessons.get(id.as_bytes()).map_err(to_storage_io)? else {
                return Err(ApiError::LessonNotFound(id.to_string()));
            };
            let current = decode(&raw)?;
            if current.status.is_terminal() {
                return Err(ApiError::LessonAlreadyCompleted(id.to_string()));
            }

            let updated = current.completed(result, at);
            let value = serde_json::to_vec(&updated).map_err(to_storage_data)?;
            let swapped = self
                .lessons
                .compare_and_swap(id.as_bytes(), Some(&raw), Some(value))
                .map_err(to_storage_io)?;
            if swapped.is_ok() {
                self.flush()?;
                return Ok(updated);
            }
        }
    }

    /// Records still `generating` whose last update is before `cutoff`.
    pub fn stale_generating(&self, cutoff: DateTime<Utc>) -> Result<Vec<LessonRecord>, StorageError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|record| record.status == LessonStatus::Generating && record.updated_at < cutoff)
            .collect())
    }

    /// Fail every stale `generating` record for which `skip` is false.
    /// Returns the ids that were transitioned.
    pub fn fail_stale<F>(
        &self,
        cutoff: DateTime<Utc>,
        message: &str,
        skip: F,
    ) -> Result<Vec<String>, ApiError>
    where
        F: Fn(&str) -> bool,
    {
        let mut failed = Vec::new();
        let result = GenerationResult::Failed {
            error: message.to_string(),
        };
        for record in self.stale_generating(cutoff)? {
            if skip(&record.id) {
                continue;
            }
            match self.complete(&record.id, &result, Utc::now()) {
                Ok(_) => failed.push(record.id),
                // finished between the scan and the swap
                Err(ApiError::LessonAlreadyCompleted(_)) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(failed)
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush().map_err(to_storage_io)?;
        Ok(())
    }
}

/// Trailing per-process counter of a `lesson-<millis>-<pid>-<seq>` id.
fn id_sequence(id: &str) -> Option<u64> {
    id.rsplit('-').next()?.parse().ok()
}

fn decode(raw: &IVec) -> Result<LessonRecord, StorageError> {
    serde_json::from_slice(raw).map_err(to_storage_data)
}

fn to_storage_io(err: sled::Error) -> StorageError {
    StorageError::IoError(io::Error::new(io::ErrorKind::Other, err.to_string()))
}

fn to_storage_data(err: serde_json::Error) -> StorageError {
    StorageError::Serialization(err.to_string())
}
