// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recommendation backend trait.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::SolaraError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ApplianceRecord, RecommendationResult};

/// Prices a solar system for a list of finalized appliances.
#[async_trait]
pub trait RecommendationService: PluginAdapter {
    /// Submits `records` and returns the priced bundle.
    ///
    /// Returns [`SolaraError::Cancelled`] if `cancel` fires first; a
    /// cancelled request must not update any shared result state.
    async fn recommend(
        &self,
        records: &[ApplianceRecord],
        cancel: &CancellationToken,
    ) -> Result<RecommendationResult, SolaraError>;
}
