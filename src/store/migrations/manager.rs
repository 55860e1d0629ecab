//! Running migrations up and down

use anyhow::{Context, Result};
use log::{debug, info, warn};
use sqlx::SqlitePool;
use std::collections::HashSet;

use super::{AppliedMigration, Direction, Migration, applied, available, init_tracking_table};

/// Applies and rolls back the embedded migrations against one pool
pub struct MigrationManager<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MigrationManager<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Run every pending migration in version order
    pub async fn migrate_up(&self) -> Result<()> {
        self.validate().await?;

        let pending = self.pending().await?;
        if pending.is_empty() {
            debug!("No pending migrations");
            return Ok(());
        }

        info!("Running {} pending migrations", pending.len());
        for migration in pending {
            self.apply(&migration, Direction::Up).await?;
        }

        Ok(())
    }

    /// Roll back to `target_version`, or all the way down if `None`
    pub async fn migrate_down(&self, target_version: Option<i64>) -> Result<()> {
        self.validate().await?;

        let target = target_version.unwrap_or(0);
        let available = available();

        let mut to_rollback = Vec::new();
        for record in applied(self.pool).await?.into_iter().rev() {
            if record.version <= target {
                continue;
            }
            let migration = available.get(&record.version).with_context(|| {
                format!("Cannot roll back migration {}: migration not found", record.version)
            })?;
            to_rollback.push(migration.clone());
        }

        if to_rollback.is_empty() {
            info!("Already at or below version {}", target);
            return Ok(());
        }

        info!("Rolling back {} migrations to version {}", to_rollback.len(), target);
        for migration in to_rollback {
            self.apply(&migration, Direction::Down).await?;
        }

        Ok(())
    }

    /// Check that every applied migration is still embedded, unchanged
    pub async fn validate(&self) -> Result<()> {
        init_tracking_table(self.pool).await?;
        let available = available();

        for record in applied(self.pool).await? {
            let Some(migration) = available.get(&record.version) else {
                anyhow::bail!(
                    "Applied migration {} '{}' not found in available migrations",
                    record.version,
                    record.name
                );
            };

            let expected = migration.checksum();
            if record.checksum != expected {
                anyhow::bail!(
                    "Migration {} checksum mismatch! Applied: {}, Expected: {}. \
                    The migration was modified after being applied.",
                    record.version,
                    record.checksum,
                    expected
                );
            }
        }

        Ok(())
    }

    pub async fn status(&self) -> Result<MigrationStatus> {
        init_tracking_table(self.pool).await?;

        let applied = applied(self.pool).await?;
        let pending = self.pending().await?;

        Ok(MigrationStatus {
            current_version: applied.last().map(|m| m.version),
            total_available: available().len(),
            applied,
            pending,
        })
    }

    async fn pending(&self) -> Result<Vec<Migration>> {
        let applied: HashSet<i64> = applied(self.pool)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        Ok(available()
            .into_values()
            .filter(|m| !applied.contains(&m.version))
            .collect())
    }

    async fn apply(&self, migration: &Migration, direction: Direction) -> Result<()> {
        let sql = match direction {
            Direction::Up => &migration.up_sql,
            Direction::Down => &migration.down_sql,
        };

        if sql.trim().is_empty() {
            warn!(
                "Migration {} has empty {} SQL, skipping",
                migration.version,
                direction.label()
            );
            return Ok(());
        }

        info!(
            "Migrating {} {} '{}'",
            direction.label(),
            migration.version,
            migration.name
        );
        debug!("Executing SQL:\n{}", sql);

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start migration transaction")?;

        sqlx::raw_sql(sql)
            .execute(&mut *tx)
            .await
            .with_context(|| {
                format!(
                    "Failed to execute migration {} {} SQL",
                    migration.version,
                    direction.label()
                )
            })?;

        match direction {
            Direction::Up => {
                sqlx::query(
                    "INSERT INTO schema_migrations (version, name, checksum) VALUES (?, ?, ?)",
                )
                .bind(migration.version)
                .bind(&migration.name)
                .bind(migration.checksum())
                .execute(&mut *tx)
                .await
                .context("Failed to record migration")?;
            }
            Direction::Down => {
                sqlx::query("DELETE FROM schema_migrations WHERE version = ?")
                    .bind(migration.version)
                    .execute(&mut *tx)
                    .await
                    .context("Failed to remove migration record")?;
            }
        }

        tx.commit()
            .await
            .context("Failed to commit migration transaction")?;

        Ok(())
    }
}

/// Applied and pending migrations at one point in time
#[derive(Debug)]
pub struct MigrationStatus {
    pub current_version: Option<i64>,
    pub total_available: usize,
    pub applied: Vec<AppliedMigration>,
    pub pending: Vec<Migration>,
}

impl MigrationStatus {
    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }
}
