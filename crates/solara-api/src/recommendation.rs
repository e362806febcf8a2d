// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the recommendation (pricing) endpoint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use solara_config::model::BackendConfig;
use solara_core::{
    AdapterType, ApplianceRecord, HealthStatus, KeyValueStore, PluginAdapter,
    RecommendationResult, RecommendationService, SolaraError,
};
use solara_storage::{keys, load_json, save_json};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::wire::{ErrorBody, RecommendationItem, RecommendationRequest, RecommendationResponse};

/// Submits appliance lists for pricing.
///
/// Successful results are written to local storage under
/// [`keys::LAST_RECOMMENDATION`] so a later run can show them without
/// resubmitting.
#[derive(Clone)]
pub struct RecommendationClient {
    client: reqwest::Client,
    base_url: String,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl RecommendationClient {
    /// Creates a client rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SolaraError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SolaraError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store: None,
        })
    }

    /// Creates a client from the `[backend]` config section.
    pub fn from_config(config: &BackendConfig) -> Result<Self, SolaraError> {
        Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Persists successful results to `store`.
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Prices `records`.
    ///
    /// A non-success status becomes [`SolaraError::Backend`] carrying the
    /// server's `message` (or `error`) when present. If `cancel` fires first
    /// the request is dropped, [`SolaraError::Cancelled`] is returned, and
    /// nothing is persisted.
    pub async fn submit(
        &self,
        records: &[ApplianceRecord],
        cancel: &CancellationToken,
    ) -> Result<RecommendationResult, SolaraError> {
        if records.is_empty() {
            return Err(SolaraError::Validation(
                "add at least one appliance before requesting a recommendation".into(),
            ));
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("recommendation request aborted");
                return Err(SolaraError::Cancelled);
            }
            result = self.post(records) => result?,
        };

        if let Some(store) = &self.store
            && let Err(e) = save_json(store.as_ref(), keys::LAST_RECOMMENDATION, &result).await
        {
            warn!(error = %e, "failed to persist recommendation");
        }

        info!(
            components = result.components.len(),
            total = result.pricing.total_amount,
            "recommendation received"
        );
        Ok(result)
    }

    /// The most recently persisted result, if any and if it parses.
    pub async fn last_result(&self) -> Option<RecommendationResult> {
        let store = self.store.as_ref()?;
        load_json(store.as_ref(), keys::LAST_RECOMMENDATION).await
    }

    async fn post(&self, records: &[ApplianceRecord]) -> Result<RecommendationResult, SolaraError> {
        let body = RecommendationRequest {
            items: records.iter().map(RecommendationItem::from).collect(),
        };

        let response = self
            .client
            .post(format!("{}/api/recommendations", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| SolaraError::Backend {
                status: None,
                message: format!("could not reach the recommendation service: {e}"),
            })?;

        let status = response.status();
        debug!(status = %status, items = body.items.len(), "recommendation response received");

        let text = response.text().await.map_err(|e| SolaraError::Backend {
            status: Some(status.as_u16()),
            message: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            return Err(SolaraError::Backend {
                status: Some(status.as_u16()),
                message,
            });
        }

        let parsed: RecommendationResponse =
            serde_json::from_str(&text).map_err(|e| SolaraError::Backend {
                status: Some(status.as_u16()),
                message: format!("unexpected recommendation response: {e}"),
            })?;
        Ok(parsed.recommendation)
    }
}

#[async_trait]
impl PluginAdapter for RecommendationClient {
    fn name(&self) -> &str {
        "recommendation-http"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Recommendation
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaraError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl RecommendationService for RecommendationClient {
    async fn recommend(
        &self,
        records: &[ApplianceRecord],
        cancel: &CancellationToken,
    ) -> Result<RecommendationResult, SolaraError> {
        self.submit(records, cancel).await
    }
}
