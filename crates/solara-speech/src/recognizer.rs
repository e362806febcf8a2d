// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cloud recognizer and the tiered fallback chain.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use solara_core::{
    AdapterType, HealthStatus, Microphone, PluginAdapter, RecognitionError, SolaraError,
    SpeechRecognizer, SpeechTier, Transcript,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::CloudSpeechClient;
use crate::guard::MicrophoneGuard;

/// Extra time allowed past a tier's listening ceiling for upload and
/// transcription.
const TRANSCRIBE_GRACE: Duration = Duration::from_secs(5);

/// Records from the microphone and transcribes through the voice service.
pub struct CloudRecognizer {
    microphone: Arc<dyn Microphone>,
    client: CloudSpeechClient,
}

impl CloudRecognizer {
    pub fn new(microphone: Arc<dyn Microphone>, client: CloudSpeechClient) -> Self {
        Self { microphone, client }
    }
}

#[async_trait]
impl PluginAdapter for CloudRecognizer {
    fn name(&self) -> &str {
        "cloud-stt"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SpeechToText
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaraError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl SpeechRecognizer for CloudRecognizer {
    fn tier(&self) -> SpeechTier {
        SpeechTier::Cloud
    }

    async fn recognize(
        &self,
        max_duration: Duration,
        cancel: &CancellationToken,
    ) -> Result<Transcript, SolaraError> {
        let audio = {
            let mut guard = MicrophoneGuard::acquire(self.microphone.as_ref())?;
            guard.record(max_duration, cancel).await?
        };
        if audio.bytes.is_empty() {
            return Err(RecognitionError::NoSpeech.into());
        }
        debug!(bytes = audio.bytes.len(), format = %audio.format, "captured audio");

        tokio::select! {
            _ = cancel.cancelled() => Err(SolaraError::Cancelled),
            result = self.client.transcribe(&audio) => result,
        }
    }
}

/// A recognizer paired with its listening ceiling.
#[derive(Clone)]
pub struct RecognizerTier {
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub ceiling: Duration,
}

impl RecognizerTier {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, ceiling: Duration) -> Self {
        Self {
            recognizer,
            ceiling,
        }
    }
}

/// Tries recognizer tiers in order until one produces a transcript.
#[derive(Clone, Default)]
pub struct TieredRecognizer {
    tiers: Vec<RecognizerTier>,
}

impl TieredRecognizer {
    pub fn new(tiers: Vec<RecognizerTier>) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &[RecognizerTier] {
        &self.tiers
    }

    /// Captures one utterance.
    ///
    /// Each tier runs under a timeout at its ceiling (plus transcription
    /// grace); an elapsed tier counts as `no-speech`. A failing tier falls
    /// through to the next without surfacing anything. When every tier
    /// fails, the last tier's typed error is returned. Cancellation is
    /// returned immediately as [`SolaraError::Cancelled`].
    pub async fn listen(&self, cancel: &CancellationToken) -> Result<Transcript, SolaraError> {
        let mut last = RecognitionError::Unsupported;

        for tier in &self.tiers {
            if cancel.is_cancelled() {
                return Err(SolaraError::Cancelled);
            }

            let name = tier.recognizer.name().to_string();
            let attempt = tokio::time::timeout(
                tier.ceiling + TRANSCRIBE_GRACE,
                tier.recognizer.recognize(tier.ceiling, cancel),
            )
            .await;

            let kind = match attempt {
                Ok(Ok(transcript)) => {
                    info!(
                        tier = %transcript.tier,
                        confidence = transcript.confidence,
                        "utterance recognized"
                    );
                    return Ok(transcript);
                }
                Ok(Err(SolaraError::Cancelled)) => return Err(SolaraError::Cancelled),
                Ok(Err(SolaraError::Recognition(kind))) => kind,
                Ok(Err(e)) => {
                    warn!(recognizer = %name, error = %e, "recognizer failed");
                    RecognitionError::Network
                }
                Err(_) => RecognitionError::NoSpeech,
            };
            debug!(recognizer = %name, error = %kind, "tier failed, falling through");
            last = kind;
        }

        if cancel.is_cancelled() {
            return Err(SolaraError::Cancelled);
        }
        Err(SolaraError::Recognition(last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solara_test_utils::{MockMicrophone, ScriptedRecognizer};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tier(r: ScriptedRecognizer, secs: u64) -> RecognizerTier {
        RecognizerTier::new(Arc::new(r), Duration::from_secs(secs))
    }

    #[tokio::test]
    async fn first_successful_tier_wins() {
        let cloud = ScriptedRecognizer::new(SpeechTier::Cloud).then_text("500 watts");
        let device = ScriptedRecognizer::new(SpeechTier::Device).then_text("unused");
        let chain = TieredRecognizer::new(vec![tier(cloud, 10), tier(device.clone(), 7)]);

        let t = chain.listen(&CancellationToken::new()).await.unwrap();
        assert_eq!(t.text, "500 watts");
        assert_eq!(t.tier, SpeechTier::Cloud);
        assert_eq!(device.calls(), 0);
    }

    #[tokio::test]
    async fn failing_tier_falls_through() {
        let cloud =
            ScriptedRecognizer::new(SpeechTier::Cloud).then_error(RecognitionError::Network);
        let device = ScriptedRecognizer::new(SpeechTier::Device).then_text("I have a freezer");
        let chain = TieredRecognizer::new(vec![tier(cloud, 10), tier(device, 7)]);

        let t = chain.listen(&CancellationToken::new()).await.unwrap();
        assert_eq!(t.text, "I have a freezer");
        assert_eq!(t.tier, SpeechTier::Device);
    }

    #[tokio::test]
    async fn all_tiers_failing_returns_last_error() {
        let cloud =
            ScriptedRecognizer::new(SpeechTier::Cloud).then_error(RecognitionError::Network);
        let device =
            ScriptedRecognizer::new(SpeechTier::Device).then_error(RecognitionError::NoSpeech);
        let chain = TieredRecognizer::new(vec![tier(cloud, 10), tier(device, 7)]);

        let err = chain.listen(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(
            err,
            SolaraError::Recognition(RecognitionError::NoSpeech)
        ));
    }

    #[tokio::test]
    async fn no_tiers_is_unsupported() {
        let err = TieredRecognizer::default()
            .listen(&CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SolaraError::Recognition(RecognitionError::Unsupported)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_tier_times_out_as_no_speech() {
        let device = ScriptedRecognizer::new(SpeechTier::Device).then_hang();
        let chain = TieredRecognizer::new(vec![tier(device, 7)]);

        let err = chain.listen(&CancellationToken::new()).await.unwrap_err();
        assert!(matches!(
            err,
            SolaraError::Recognition(RecognitionError::NoSpeech)
        ));
    }

    #[tokio::test]
    async fn cancellation_is_not_a_fallthrough() {
        let device = ScriptedRecognizer::new(SpeechTier::Device).then_hang();
        let chain = TieredRecognizer::new(vec![tier(device, 60)]);
        let cancel = CancellationToken::new();

        let stopper = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            stopper.cancel();
        });

        let err = chain.listen(&cancel).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn cloud_recognizer_releases_microphone_after_transcribing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/voice/stt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "transcript": "two fans",
                "confidence": 0.8
            })))
            .mount(&server)
            .await;

        let mic = Arc::new(MockMicrophone::with_audio(b"pcm".to_vec()));
        let client = CloudSpeechClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let recognizer = CloudRecognizer::new(mic.clone(), client);

        let t = recognizer
            .recognize(Duration::from_secs(10), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(t.text, "two fans");
        assert_eq!(mic.acquisitions(), 1);
        assert_eq!(mic.open_streams(), 0);
    }

    #[tokio::test]
    async fn denied_microphone_surfaces_not_allowed() {
        let mic = Arc::new(MockMicrophone::denied());
        let client = CloudSpeechClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let recognizer = CloudRecognizer::new(mic, client);

        let err = recognizer
            .recognize(Duration::from_secs(1), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SolaraError::Recognition(RecognitionError::NotAllowed)
        ));
    }
}
