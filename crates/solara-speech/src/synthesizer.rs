// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cloud synthesizer and the cloud-then-device fallback.

use std::sync::Arc;

use async_trait::async_trait;
use solara_core::{
    AdapterType, AudioPlayer, HealthStatus, PluginAdapter, SolaraError, SpeechSynthesizer,
    VoiceProfile,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::CloudSpeechClient;

/// Fetches audio from the voice service and plays it.
pub struct CloudSynthesizer {
    client: CloudSpeechClient,
    player: Arc<dyn AudioPlayer>,
}

impl CloudSynthesizer {
    pub fn new(client: CloudSpeechClient, player: Arc<dyn AudioPlayer>) -> Self {
        Self { client, player }
    }
}

#[async_trait]
impl PluginAdapter for CloudSynthesizer {
    fn name(&self) -> &str {
        "cloud-tts"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::TextToSpeech
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaraError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SpeechSynthesizer for CloudSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        profile: &VoiceProfile,
        cancel: &CancellationToken,
    ) -> Result<(), SolaraError> {
        let audio = tokio::select! {
            _ = cancel.cancelled() => return Err(SolaraError::Cancelled),
            audio = self.client.synthesize_audio(text, profile) => audio?,
        };
        debug!(bytes = audio.len(), "playing synthesized audio");
        self.player.play(&audio, cancel).await
    }
}

/// Speaks through the cloud tier when available, otherwise on-device.
#[derive(Clone)]
pub struct TieredSynthesizer {
    cloud: Option<Arc<dyn SpeechSynthesizer>>,
    device: Arc<dyn SpeechSynthesizer>,
}

impl TieredSynthesizer {
    pub fn new(cloud: Option<Arc<dyn SpeechSynthesizer>>, device: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { cloud, device }
    }

    /// Speaks `text`, resolving once playback finishes.
    ///
    /// A cloud failure (network error or non-success status) falls back to
    /// the device synthesizer. Cancellation is never retried.
    pub async fn speak(
        &self,
        text: &str,
        profile: &VoiceProfile,
        cancel: &CancellationToken,
    ) -> Result<(), SolaraError> {
        if let Some(cloud) = &self.cloud {
            match cloud.synthesize(text, profile, cancel).await {
                Ok(()) => return Ok(()),
                Err(SolaraError::Cancelled) => return Err(SolaraError::Cancelled),
                Err(e) => warn!(error = %e, "cloud synthesis failed, using device voice"),
            }
        }
        if cancel.is_cancelled() {
            return Err(SolaraError::Cancelled);
        }
        self.device.synthesize(text, profile, cancel).await
    }
}
