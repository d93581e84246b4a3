// SQLite storage configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{Result, StoreError};

/// Storage configuration for SQLite
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database path; `None` resolves under the platform data
    /// directory
    pub sqlite_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Create new storage configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration pinned to a specific database path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            sqlite_path: Some(path.into()),
        }
    }

    /// Get the SQLite database path
    pub fn get_sqlite_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.sqlite_path {
            Ok(path.clone())
        } else {
            // Default to data directory
            let mut data_dir = dirs::data_dir()
                .ok_or_else(|| StoreError::Config("Failed to get data directory".to_string()))?;
            data_dir.push("pastegate");
            data_dir.push("permissions.db");
            Ok(data_dir)
        }
    }

    /// Get the database URL for the resolved path
    pub fn database_url(&self) -> Result<String> {
        Ok(format!("sqlite:{}", self.get_sqlite_path()?.display()))
    }
}
