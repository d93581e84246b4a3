// Per-(user, paste) permission overlay over a permission store

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::storage::{PermissionStore, Result, StoreError};
use crate::types::{Permission, PermissionRow};

/// In-memory handle over one user's permission row for one paste.
///
/// Loaded once at construction and mirrored back to storage on every
/// mutation. The first storage failure poisons the handle: `grant` and
/// `revoke` return the recorded error without touching storage again,
/// and `has` reports nothing as granted. A poisoned overlay cannot
/// recover; load a fresh one instead.
///
/// An overlay is meant to live for one logical operation (one request).
/// It owns its snapshot exclusively and must not be shared across
/// concurrent callers.
pub struct PermissionOverlay<'a> {
    store: &'a dyn PermissionStore,
    cancel: CancellationToken,
    state: OverlayState,
}

/// Overlay lifecycle state. `Failed` is terminal.
enum OverlayState {
    Active(PermissionRow),
    Failed(StoreError),
}

impl<'a> PermissionOverlay<'a> {
    /// Load the permission row for `user_id`, or start from an empty
    /// mask when none exists. A failed read still yields an overlay; it
    /// reports the recorded error from every mutating call.
    pub async fn load(
        store: &'a dyn PermissionStore,
        cancel: CancellationToken,
        user_id: i64,
        paste_id: &str,
    ) -> PermissionOverlay<'a> {
        let state = match with_cancel(&cancel, store.get_by_user(user_id)).await {
            Ok(Some(row)) => OverlayState::Active(row),
            Ok(None) => OverlayState::Active(PermissionRow::new(user_id, paste_id)),
            Err(err) => {
                tracing::error!("Failed to load permissions for user {}: {}", user_id, err);
                OverlayState::Failed(err)
            }
        };

        PermissionOverlay {
            store,
            cancel,
            state,
        }
    }

    /// Reports whether any bit of `perm` is held. Fails closed: a
    /// poisoned overlay answers `false`, and no error ever surfaces
    /// through this call.
    pub fn has(&self, perm: Permission) -> bool {
        match &self.state {
            OverlayState::Active(row) => row.permissions.intersects(perm),
            OverlayState::Failed(_) => false,
        }
    }

    /// The error recorded by a failed load or mutation, if any.
    pub fn error(&self) -> Option<&StoreError> {
        match &self.state {
            OverlayState::Active(_) => None,
            OverlayState::Failed(err) => Some(err),
        }
    }

    /// Current in-memory permission mask. Empty on a poisoned overlay.
    pub fn permissions(&self) -> Permission {
        match &self.state {
            OverlayState::Active(row) => row.permissions,
            OverlayState::Failed(_) => Permission::empty(),
        }
    }

    /// Merge `perm` into the stored mask. Granting an already-held bit
    /// is value-wise a no-op but still a successful write.
    pub async fn grant(&mut self, perm: Permission) -> Result<()> {
        let (user_id, paste_id) = match &self.state {
            OverlayState::Active(row) => (row.user_id, row.paste_id.clone()),
            OverlayState::Failed(err) => return Err(err.clone()),
        };

        let merged = with_cancel(
            &self.cancel,
            self.store.upsert_merge(user_id, &paste_id, perm),
        )
        .await;

        match merged {
            Ok(merged) => {
                tracing::info!(
                    "New permission set {:#x} for user {} on paste {}",
                    merged.bits(),
                    user_id,
                    paste_id
                );
                if let OverlayState::Active(row) = &mut self.state {
                    row.permissions = merged;
                }
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    "Failed to grant {:#x} to user {} on paste {}: {}",
                    perm.bits(),
                    user_id,
                    paste_id,
                    err
                );
                self.state = OverlayState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Clear the bits of `perm` from the stored mask, leaving all other
    /// bits untouched. A mask that empties out deletes the row: zero
    /// permissions are represented by row absence, never by a zero row.
    pub async fn revoke(&mut self, perm: Permission) -> Result<()> {
        let (user_id, paste_id, held) = match &self.state {
            OverlayState::Active(row) => (row.user_id, row.paste_id.clone(), row.permissions),
            OverlayState::Failed(err) => return Err(err.clone()),
        };

        let remaining = held.difference(perm);
        let result = if remaining.is_empty() {
            with_cancel(&self.cancel, self.store.delete(user_id, &paste_id)).await
        } else {
            with_cancel(
                &self.cancel,
                self.store.update(user_id, &paste_id, remaining),
            )
            .await
        };

        match result {
            Ok(()) => {
                if let OverlayState::Active(row) = &mut self.state {
                    row.permissions = remaining;
                }
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    "Failed to revoke {:#x} from user {} on paste {}: {}",
                    perm.bits(),
                    user_id,
                    paste_id,
                    err
                );
                self.state = OverlayState::Failed(err.clone());
                Err(err)
            }
        }
    }
}

/// Run a storage call under the overlay's cancellation token.
async fn with_cancel<T>(
    cancel: &CancellationToken,
    op: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        _ = cancel.cancelled() => Err(StoreError::Canceled),
        result = op => result,
    }
}
