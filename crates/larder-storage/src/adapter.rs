// SPDX-FileCopyrightText: 2026 Larder Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the matcher's collaborator traits.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::debug;

use larder_config::model::StorageConfig;
use larder_core::{
    CachedSuggestionSet, FeedbackLog, FeedbackRecord, GenerationLog, GenerationRecord,
    HealthStatus, LarderError, MatchingStatistics, PantryItem, PantrySource, SuggestionStore,
};

use crate::database::{map_tr_err, Database};
use crate::queries;

/// SQLite-backed storage for pantry items, suggestions, feedback, and generations.
///
/// The database is opened by [`SqliteStorage::initialize`]; every other call
/// fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a storage handle. Nothing is opened until [`initialize`](Self::initialize).
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Create and initialize in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, LarderError> {
        let storage = Self::new(config);
        storage.initialize().await?;
        Ok(storage)
    }

    /// Wrap an already-open database.
    pub fn with_database(config: StorageConfig, db: Database) -> Self {
        Self {
            config,
            db: OnceCell::new_with(Some(db)),
        }
    }

    fn db(&self) -> Result<&Database, LarderError> {
        self.db.get().ok_or_else(|| LarderError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    /// Open the configured database and run migrations.
    pub async fn initialize(&self) -> Result<(), LarderError> {
        let path = self.config.database_path.clone();
        let db = Database::open_with_options(&path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| LarderError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    /// Checkpoint the WAL. The connection itself closes on drop.
    pub async fn close(&self) -> Result<(), LarderError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<HealthStatus, LarderError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    // --- Pantry maintenance ---

    pub async fn add_pantry_item(&self, user_id: &str, item: &PantryItem) -> Result<(), LarderError> {
        validate_item(item)?;
        queries::pantry::upsert_item(self.db()?, user_id, item).await
    }

    /// Validate every item, then write them all in one transaction.
    ///
    /// Nothing is written when any item is invalid or any row fails.
    pub async fn add_pantry_items(
        &self,
        user_id: &str,
        items: &[PantryItem],
    ) -> Result<usize, LarderError> {
        items.iter().try_for_each(validate_item)?;
        queries::pantry::upsert_items(self.db()?, user_id, items).await
    }

    /// Returns false when the user had no active item with that id.
    pub async fn consume_pantry_item(&self, user_id: &str, item_id: &str) -> Result<bool, LarderError> {
        queries::pantry::mark_consumed(self.db()?, user_id, item_id).await
    }

    // --- Cache maintenance ---

    /// Delete stale and expired suggestion rows.
    pub async fn purge_expired_suggestions(&self) -> Result<u64, LarderError> {
        let deleted = queries::suggestions::purge_expired(self.db()?, Utc::now()).await?;
        debug!(deleted, "purged expired suggestions");
        Ok(deleted)
    }

    pub async fn recent_feedback(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<FeedbackRecord>, LarderError> {
        queries::feedback::list_feedback(self.db()?, user_id, limit).await
    }
}

fn validate_item(item: &PantryItem) -> Result<(), LarderError> {
    if item.id.trim().is_empty() {
        return Err(LarderError::InvalidInput(format!(
            "pantry item {:?} has an empty id",
            item.name
        )));
    }
    if !item.quantity.is_finite() || item.quantity < 0.0 {
        return Err(LarderError::InvalidInput(format!(
            "pantry item {} has invalid quantity {}",
            item.id, item.quantity
        )));
    }
    Ok(())
}

#[async_trait]
impl PantrySource for SqliteStorage {
    async fn get_pantry_items(&self, user_id: &str) -> Result<Vec<PantryItem>, LarderError> {
        queries::pantry::list_active_items(self.db()?, user_id).await
    }
}

#[async_trait]
impl SuggestionStore for SqliteStorage {
    async fn get_suggestions(
        &self,
        user_id: &str,
        ingredient_name: &str,
    ) -> Result<Option<CachedSuggestionSet>, LarderError> {
        queries::suggestions::get_suggestions(self.db()?, user_id, ingredient_name).await
    }

    async fn put_suggestions(&self, set: &CachedSuggestionSet) -> Result<(), LarderError> {
        queries::suggestions::upsert_suggestions(self.db()?, set).await
    }

    async fn invalidate_user(&self, user_id: &str) -> Result<u64, LarderError> {
        queries::suggestions::invalidate_user(self.db()?, user_id).await
    }
}

#[async_trait]
impl FeedbackLog for SqliteStorage {
    async fn append_feedback(&self, record: &FeedbackRecord) -> Result<(), LarderError> {
        queries::feedback::insert_feedback(self.db()?, record).await
    }
}

#[async_trait]
impl GenerationLog for SqliteStorage {
    async fn record_generation(&self, record: &GenerationRecord) -> Result<(), LarderError> {
        queries::generations::insert_generation(self.db()?, record).await
    }

    async fn matching_statistics(
        &self,
        user_id: &str,
        days: u32,
    ) -> Result<MatchingStatistics, LarderError> {
        queries::generations::matching_statistics(self.db()?, user_id, days).await
    }
}
