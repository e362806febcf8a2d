// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that speech, storage and backend adapters implement.

use async_trait::async_trait;

use crate::error::SolaraError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all Solara adapters.
///
/// Provides identity and a health check so the CLI can report which tiers
/// are usable before starting a dialogue.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the kind of adapter.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, SolaraError>;
}
