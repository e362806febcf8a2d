// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the KeyValueStore trait.

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio::sync::OnceCell;
use tracing::debug;

use solara_config::model::StorageConfig;
use solara_core::{AdapterType, HealthStatus, KeyValueStore, PluginAdapter, SolaraError};

use crate::database::{map_tr_err, Database};

/// SQLite-backed key-value store.
///
/// The database is lazily opened on the first call to [`SqliteStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`](Self::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Opens the store at the configured path in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, SolaraError> {
        let store = Self::new(config);
        store.initialize().await?;
        Ok(store)
    }

    /// Opens the database and creates the schema.
    pub async fn initialize(&self) -> Result<(), SolaraError> {
        let db = Database::open(&self.config.database_path).await?;
        self.db.set(db).map_err(|_| SolaraError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    /// Checkpoints the WAL before the process exits.
    pub async fn close(&self) -> Result<(), SolaraError> {
        self.db()?.checkpoint().await
    }

    fn db(&self) -> Result<&Database, SolaraError> {
        self.db.get().ok_or_else(|| SolaraError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaraError> {
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
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SolaraError> {
        let key = key.to_string();
        self.db()?
            .connection()
            .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
                conn.query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    rusqlite::params![key],
                    |row| row.get(0),
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SolaraError> {
        let key = key.to_string();
        let value = value.to_string();
        let updated_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
        let len = value.len();
        self.db()?
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value, \
                     updated_at = excluded.updated_at",
                    rusqlite::params![key, value, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(bytes = len, "kv value stored");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SolaraError> {
        let key = key.to_string();
        self.db()?
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute("DELETE FROM kv_store WHERE key = ?1", rusqlite::params![key])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}
