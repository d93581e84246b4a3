// SQLite storage connection pool management

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use super::{Result, StoreError};

/// SQLite storage manager owning the connection pool
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open (creating if missing) the database behind `database_url` and
    /// initialize the permission schema.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::Database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            // Enable WAL mode for better concurrency
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                StoreError::Database(format!("Failed to create connection pool: {}", e))
            })?;

        let storage = Self { pool };
        storage.initialize_schema().await?;

        tracing::info!("SQLite storage initialized at {}", database_url);

        Ok(storage)
    }

    /// Create tables and indexes if they do not exist yet
    async fn initialize_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_paste_permissions (
                user_id INTEGER NOT NULL,
                paste_id TEXT NOT NULL,
                permissions INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (user_id, paste_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to create permissions table: {}", e)))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_user_paste_permissions_user_id \
             ON user_paste_permissions(user_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to create permissions index: {}", e)))?;

        Ok(())
    }

    /// Get the connection pool for use by storage modules
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the connection pool
    pub async fn close(self) {
        self.pool.close().await;
        tracing::info!("SQLite connection pool closed");
    }

    /// Perform health check on the database
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Database health check failed: {}", e)))?;

        Ok(())
    }
}
