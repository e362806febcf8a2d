// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Defensive JSON reads and writes on top of a [`KeyValueStore`].
//!
//! Stored values may be corrupt (hand-edited, truncated, written by an older
//! build). A value that fails to parse is logged, removed, and treated as
//! absent so callers fall back to their default.

use serde::Serialize;
use serde::de::DeserializeOwned;
use solara_core::{KeyValueStore, SolaraError};
use tracing::warn;

/// Reads and parses the JSON value under `key`.
///
/// Returns `None` when the key is missing, unreadable, or malformed. Malformed
/// values are removed from the store.
pub async fn load_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "failed to read stored value, using default");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "stored value is malformed, discarding");
            if let Err(e) = store.remove(key).await {
                warn!(key, error = %e, "failed to remove malformed value");
            }
            None
        }
    }
}

/// Serializes `value` as JSON and stores it under `key`.
pub async fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), SolaraError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)
        .map_err(|e| SolaraError::Internal(format!("failed to serialize `{key}`: {e}")))?;
    store.set(key, &raw).await
}
