// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key-value storage trait (the "local storage" of the engine).

use async_trait::async_trait;

use crate::error::SolaraError;
use crate::traits::adapter::PluginAdapter;

/// String key-value store with last-writer-wins semantics.
///
/// Values are opaque strings; callers serialize JSON themselves and must
/// parse defensively since a stored value may be corrupt.
#[async_trait]
pub trait KeyValueStore: PluginAdapter {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, SolaraError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), SolaraError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), SolaraError>;
}
