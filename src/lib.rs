//! Per-user paste permission overlays backed by SQLite.
//!
//! A [`PermissionOverlay`] wraps the single permission row for one
//! (user, paste) pair: it loads the row once, answers permission checks
//! from memory, and pushes every grant or revoke straight to storage.
//! Grants merge bits atomically in the database; revokes that empty the
//! mask delete the row, so "no permissions" is always represented by row
//! absence. After the first storage failure the overlay is poisoned and
//! every further mutation returns that same error.
//!
//! ```no_run
//! use pastegate::{Permission, PermissionOverlay, PermissionStorage, SqliteStorage, StorageConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> pastegate::Result<()> {
//! let config = StorageConfig::default();
//! let storage = SqliteStorage::new(&config.database_url()?).await?;
//! let store = PermissionStorage::new(storage.pool().clone());
//!
//! let mut overlay = PermissionOverlay::load(&store, CancellationToken::new(), 42, "abcdef").await;
//! if !overlay.has(Permission::WRITE) {
//!     overlay.grant(Permission::WRITE).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod overlay;
pub mod storage;
pub mod types;

pub use overlay::PermissionOverlay;
pub use storage::{
    PermissionStorage, PermissionStore, Result, SqliteStorage, StorageConfig, StoreError,
};
pub use types::{Permission, PermissionRow};
