// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime wiring shared by every subcommand.

use std::sync::Arc;

use solara_api::RecommendationClient;
use solara_config::SolaraConfig;
use solara_core::{KeyValueStore, SolaraError};
use solara_session::{ApplianceForm, AppState, KvStatePersistence, StatePersistence};
use solara_storage::{MemoryStore, SqliteStore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Configuration, local storage and the root cancellation token.
pub struct App {
    pub config: SolaraConfig,
    pub store: Arc<dyn KeyValueStore>,
    pub cancel: CancellationToken,
    sqlite: Option<Arc<SqliteStore>>,
}

impl App {
    /// Opens local storage: SQLite at the configured path, or an in-memory
    /// store when `ephemeral` is set.
    pub async fn open(
        config: SolaraConfig,
        ephemeral: bool,
        cancel: CancellationToken,
    ) -> Result<Self, SolaraError> {
        let sqlite = if ephemeral {
            debug!("using in-memory storage");
            None
        } else {
            Some(Arc::new(SqliteStore::open(config.storage.clone()).await?))
        };
        let store: Arc<dyn KeyValueStore> = match &sqlite {
            Some(sqlite) => sqlite.clone(),
            None => Arc::new(MemoryStore::new()),
        };
        Ok(Self {
            config,
            store,
            cancel,
            sqlite,
        })
    }

    /// The stored appliance list with an empty draft.
    pub async fn form(&self) -> ApplianceForm {
        let mut form = ApplianceForm::new();
        form.restore(self.store.as_ref()).await;
        form
    }

    pub async fn load_state(&self) -> AppState {
        self.persistence().load().await
    }

    pub async fn save_state(&self, state: &AppState) -> Result<(), SolaraError> {
        self.persistence().save(state).await
    }

    /// Recommendation client that persists results to local storage.
    pub fn recommendation_client(&self) -> Result<RecommendationClient, SolaraError> {
        Ok(RecommendationClient::from_config(&self.config.backend)?.with_store(self.store.clone()))
    }

    /// Flushes SQLite before exit. Failures are logged only.
    pub async fn close(&self) {
        if let Some(sqlite) = &self.sqlite
            && let Err(e) = sqlite.close().await
        {
            warn!(error = %e, "failed to checkpoint local storage");
        }
    }

    fn persistence(&self) -> KvStatePersistence {
        KvStatePersistence::new(self.store.clone())
    }
}
