// Permission row storage with SQLite

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use super::{PermissionStore, Result, StoreError};
use crate::types::{Permission, PermissionRow};

/// Permission storage with SQLite backend
pub struct PermissionStorage {
    pool: SqlitePool,
}

impl PermissionStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PermissionStorage {
    async fn get_by_user(&self, user_id: i64) -> Result<Option<PermissionRow>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, paste_id, permissions, created_at, updated_at
            FROM user_paste_permissions
            WHERE user_id = ?
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to load permissions: {}", e)))?;

        Ok(row.map(|row| PermissionRow {
            user_id: row.get("user_id"),
            paste_id: row.get("paste_id"),
            permissions: Permission::from_bits_retain(row.get::<i64, _>("permissions") as u32),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }))
    }

    async fn upsert_merge(
        &self,
        user_id: i64,
        paste_id: &str,
        grant: Permission,
    ) -> Result<Permission> {
        let row = sqlx::query(
            r#"
            INSERT INTO user_paste_permissions (user_id, paste_id, permissions)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, paste_id)
            DO UPDATE SET
                permissions = user_paste_permissions.permissions | excluded.permissions,
                updated_at = CURRENT_TIMESTAMP
            RETURNING permissions
            "#,
        )
        .bind(user_id)
        .bind(paste_id)
        .bind(grant.bits() as i64)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to merge permissions: {}", e)))?;

        let merged: i64 = row.get("permissions");
        Ok(Permission::from_bits_retain(merged as u32))
    }

    async fn update(&self, user_id: i64, paste_id: &str, mask: Permission) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE user_paste_permissions
            SET permissions = ?, updated_at = CURRENT_TIMESTAMP
            WHERE user_id = ? AND paste_id = ?
            "#,
        )
        .bind(mask.bits() as i64)
        .bind(user_id)
        .bind(paste_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to update permissions: {}", e)))?;

        Ok(())
    }

    async fn delete(&self, user_id: i64, paste_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM user_paste_permissions WHERE user_id = ? AND paste_id = ?")
            .bind(user_id)
            .bind(paste_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to delete permissions: {}", e)))?;

        Ok(())
    }
}
