// Permission storage module

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Permission, PermissionRow};

/// Storage error types
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation canceled")]
    Canceled,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Row-level operations a permission overlay needs from its backing
/// store.
///
/// `upsert_merge` must be atomic at the row level: on a key conflict the
/// stored mask becomes `stored | grant`, and the merged value is reported
/// by the same statement. Concurrent grants through different handles
/// then converge without a read-after-write window.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Fetch the single permission row recorded for `user_id`, if any.
    /// Row absence is `Ok(None)`, not an error.
    async fn get_by_user(&self, user_id: i64) -> Result<Option<PermissionRow>>;

    /// Insert a row for the (user, paste) key, or OR `grant` into an
    /// existing one. Returns the merged mask.
    async fn upsert_merge(
        &self,
        user_id: i64,
        paste_id: &str,
        grant: Permission,
    ) -> Result<Permission>;

    /// Replace the stored mask for the (user, paste) key. Zero rows
    /// affected is not an error.
    async fn update(&self, user_id: i64, paste_id: &str, mask: Permission) -> Result<()>;

    /// Remove the row for the (user, paste) key. Zero rows affected is
    /// not an error.
    async fn delete(&self, user_id: i64, paste_id: &str) -> Result<()>;
}

pub mod config;
pub mod permission_storage;
pub mod sqlite_storage;

pub use config::StorageConfig;
pub use permission_storage::PermissionStorage;
pub use sqlite_storage::SqliteStorage;
