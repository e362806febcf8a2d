// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading and saving [`AppState`].

use std::sync::Arc;

use async_trait::async_trait;
use solara_core::{KeyValueStore, RecommendationResult, SolaraError};
use solara_storage::{keys, load_json, save_json};

use crate::state::{AppState, Preferences, View};

/// Where application state lives between runs.
#[async_trait]
pub trait StatePersistence: Send + Sync {
    /// Loads state. Never fails: unreadable parts fall back to their defaults.
    async fn load(&self) -> AppState;

    async fn save(&self, state: &AppState) -> Result<(), SolaraError>;
}

/// Stores each part of [`AppState`] under its own key.
///
/// Each key is parsed independently, so one corrupt value does not discard
/// the others. The view is not persisted; every run starts at
/// [`View::Home`].
pub struct KvStatePersistence {
    store: Arc<dyn KeyValueStore>,
}

impl KvStatePersistence {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StatePersistence for KvStatePersistence {
    async fn load(&self) -> AppState {
        let store = self.store.as_ref();
        AppState {
            view: View::Home,
            preferences: load_json::<Preferences, _>(store, keys::PREFERENCES)
                .await
                .unwrap_or_default(),
            last_address: load_json::<String, _>(store, keys::LAST_ADDRESS).await,
            last_recommendation: load_json::<RecommendationResult, _>(
                store,
                keys::LAST_RECOMMENDATION,
            )
            .await,
        }
    }

    async fn save(&self, state: &AppState) -> Result<(), SolaraError> {
        let store = self.store.as_ref();
        save_json(store, keys::PREFERENCES, &state.preferences).await?;
        match &state.last_address {
            Some(address) => save_json(store, keys::LAST_ADDRESS, address).await?,
            None => store.remove(keys::LAST_ADDRESS).await?,
        }
        match &state.last_recommendation {
            Some(result) => save_json(store, keys::LAST_RECOMMENDATION, result).await?,
            None => store.remove(keys::LAST_RECOMMENDATION).await?,
        }
        Ok(())
    }
}
