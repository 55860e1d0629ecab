//! SQLite-backed option store

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use super::migrations::MigrationManager;
use super::{OptionStore, StoredEntry};

/// Persistent option store in a SQLite database.
///
/// Values are kept in the `options` table created by the embedded
/// migrations; see [`super::migrations`].
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap an existing pool. The schema must already be migrated.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `db_path` and migrate it
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = Self::connect(db_path).await?;
        MigrationManager::new(&pool).migrate_up().await?;
        Ok(Self::new(pool))
    }

    /// Open a fresh, migrated in-memory database
    pub async fn open_memory() -> Result<Self> {
        let pool = Self::connect_memory().await?;
        MigrationManager::new(&pool).migrate_up().await?;
        Ok(Self::new(pool))
    }

    /// Connect to a database file with WAL journaling
    pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
                log::info!("Created database directory: {:?}", parent);
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", db_path.display()))?;

        log::debug!("Connected to SQLite database: {}", db_path.display());
        Ok(pool)
    }

    /// Connect to an in-memory database.
    ///
    /// Every SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to a single connection that is never recycled.
    pub async fn connect_memory() -> Result<SqlitePool> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory database URL")?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .context("Failed to connect to in-memory database")?;

        log::debug!("Connected to in-memory SQLite database");
        Ok(pool)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn migrations(&self) -> MigrationManager<'_> {
        MigrationManager::new(&self.pool)
    }
}

#[async_trait]
impl OptionStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<StoredEntry>> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT value, default_value FROM options WHERE name = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("Failed to get option '{}'", key))?;

        Ok(row.map(|(value, default)| StoredEntry { value, default }))
    }

    async fn set(&self, key: &str, entry: StoredEntry) -> Result<()> {
        sqlx::query(
            "INSERT INTO options (name, value, default_value, updated_at)
             VALUES (?, ?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(name) DO UPDATE SET
                value = excluded.value,
                default_value = excluded.default_value,
                updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(&entry.value)
        .bind(&entry.default)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to save option '{}'", key))?;

        log::debug!("Saved option: {} = {} (default {})", key, entry.value, entry.default);
        Ok(())
    }

    async fn set_value(&self, key: &str, value: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE options SET value = ?, updated_at = CURRENT_TIMESTAMP WHERE name = ?",
        )
        .bind(value)
        .bind(key)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to update option '{}'", key))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM options WHERE name = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete option '{}'", key))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<(String, StoredEntry)>> {
        let rows: Vec<(String, String, String)> =
            sqlx::query_as("SELECT name, value, default_value FROM options ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .context("Failed to list options")?;

        Ok(rows
            .into_iter()
            .map(|(name, value, default)| (name, StoredEntry { value, default }))
            .collect())
    }
}
