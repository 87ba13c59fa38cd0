//! Workspace storage settings.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// sled database directory for lesson records; relative paths hang off the workspace root
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".lessonforge/store")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

impl StorageConfig {
    pub fn resolve_store_path(&self, workspace_root: &Path) -> Result<PathBuf, ApiError> {
        if self.store_path.as_os_str().is_empty() {
            return Err(ApiError::ConfigError(
                "Store path cannot be empty".to_string(),
            ));
        }
        if self.store_path.is_absolute() {
            Ok(self.store_path.clone())
        } else {
            Ok(workspace_root.join(&self.store_path))
        }
    }
}
