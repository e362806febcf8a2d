// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock recommendation backend with canned replies.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use solara_core::{
    AdapterType, ApplianceRecord, HealthStatus, PluginAdapter, Pricing, RecommendationResult,
    RecommendationService, SolaraError, SystemComponent,
};

#[derive(Debug, Clone)]
enum Reply {
    Result(RecommendationResult),
    Backend { status: u16, message: String },
    Hang,
}

/// A recommendation service that replays queued replies and records every
/// submission. With no queued reply it answers [`MockRecommendationService::sample_result`].
#[derive(Clone, Default)]
pub struct MockRecommendationService {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    submissions: Arc<Mutex<Vec<Vec<ApplianceRecord>>>>,
}

impl MockRecommendationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_result(self, result: RecommendationResult) -> Self {
        self.push(Reply::Result(result))
    }

    pub fn then_backend_error(self, status: u16, message: impl Into<String>) -> Self {
        self.push(Reply::Backend {
            status,
            message: message.into(),
        })
    }

    /// Next call blocks until cancelled.
    pub fn then_hang(self) -> Self {
        self.push(Reply::Hang)
    }

    /// Every list submitted so far.
    pub fn submissions(&self) -> Vec<Vec<ApplianceRecord>> {
        self.submissions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// A small inverter + battery + panel bundle totalling ₦1,075,000.
    pub fn sample_result() -> RecommendationResult {
        let mut components = BTreeMap::new();
        components.insert(
            "inverter".to_string(),
            SystemComponent {
                name: "5kVA Hybrid Inverter".into(),
                quantity: 1,
                warranty: Some("2 years".into()),
            },
        );
        components.insert(
            "battery".to_string(),
            SystemComponent {
                name: "200Ah Tubular Battery".into(),
                quantity: 4,
                warranty: Some("1 year".into()),
            },
        );
        components.insert(
            "solarPanel".to_string(),
            SystemComponent {
                name: "450W Mono Panel".into(),
                quantity: 6,
                warranty: Some("10 years".into()),
            },
        );
        RecommendationResult {
            components,
            pricing: Pricing {
                subtotal: 1_000_000.0,
                vat: 75_000.0,
                total_amount: 1_075_000.0,
            },
            performance: Default::default(),
        }
    }

    fn push(self, reply: Reply) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
        self
    }
}

#[async_trait]
impl PluginAdapter for MockRecommendationService {
    fn name(&self) -> &str {
        "mock-recommendation"
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
impl RecommendationService for MockRecommendationService {
    async fn recommend(
        &self,
        records: &[ApplianceRecord],
        cancel: &CancellationToken,
    ) -> Result<RecommendationResult, SolaraError> {
        if let Ok(mut submissions) = self.submissions.lock() {
            submissions.push(records.to_vec());
        }
        let reply = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        match reply {
            Some(Reply::Result(result)) => Ok(result),
            Some(Reply::Backend { status, message }) => Err(SolaraError::Backend {
                status: Some(status),
                message,
            }),
            Some(Reply::Hang) => {
                cancel.cancelled().await;
                Err(SolaraError::Cancelled)
            }
            None => Ok(Self::sample_result()),
        }
    }
}
