// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock speech adapters for deterministic testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use solara_core::{
    AdapterType, HealthStatus, PluginAdapter, RecognitionError, SolaraError, SpeechRecognizer,
    SpeechSynthesizer, SpeechTier, Transcript, VoiceProfile,
};

#[derive(Debug, Clone)]
enum Step {
    Text(String),
    Error(RecognitionError),
    Hang,
}

/// A recognizer that replays a script of utterances and failures.
///
/// Each `recognize()` call consumes one step. `then_hang()` blocks until the
/// call is cancelled. An exhausted script answers `no-speech`.
#[derive(Clone)]
pub struct ScriptedRecognizer {
    tier: SpeechTier,
    script: Arc<Mutex<VecDeque<Step>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedRecognizer {
    pub fn new(tier: SpeechTier) -> Self {
        Self {
            tier,
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Recognizer that hears each of `utterances` in turn.
    pub fn from_utterances<I, S>(tier: SpeechTier, utterances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        utterances
            .into_iter()
            .fold(Self::new(tier), |r, u| r.then_text(u))
    }

    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.push(Step::Text(text.into()))
    }

    pub fn then_error(self, kind: RecognitionError) -> Self {
        self.push(Step::Error(kind))
    }

    pub fn then_hang(self) -> Self {
        self.push(Step::Hang)
    }

    /// Number of `recognize()` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Steps not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn push(self, step: Step) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(step);
        }
        self
    }
}

#[async_trait]
impl PluginAdapter for ScriptedRecognizer {
    fn name(&self) -> &str {
        "scripted-stt"
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
impl SpeechRecognizer for ScriptedRecognizer {
    fn tier(&self) -> SpeechTier {
        self.tier
    }

    async fn recognize(
        &self,
        _max_duration: Duration,
        cancel: &CancellationToken,
    ) -> Result<Transcript, SolaraError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if cancel.is_cancelled() {
            return Err(SolaraError::Cancelled);
        }
        let step = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match step {
            Some(Step::Text(text)) => Ok(Transcript {
                text,
                confidence: 0.9,
                tier: self.tier,
            }),
            Some(Step::Error(kind)) => Err(SolaraError::Recognition(kind)),
            Some(Step::Hang) => {
                cancel.cancelled().await;
                Err(SolaraError::Cancelled)
            }
            None => Err(SolaraError::Recognition(RecognitionError::NoSpeech)),
        }
    }
}

/// A synthesizer that records every utterance it is asked to speak.
#[derive(Clone, Default)]
pub struct RecordingSynthesizer {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything spoken so far, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Whether any spoken line contains `needle`.
    pub fn said(&self, needle: &str) -> bool {
        self.spoken().iter().any(|s| s.contains(needle))
    }
}

#[async_trait]
impl PluginAdapter for RecordingSynthesizer {
    fn name(&self) -> &str {
        "recording-tts"
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
impl SpeechSynthesizer for RecordingSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        _profile: &VoiceProfile,
        cancel: &CancellationToken,
    ) -> Result<(), SolaraError> {
        if cancel.is_cancelled() {
            return Err(SolaraError::Cancelled);
        }
        if let Ok(mut spoken) = self.spoken.lock() {
            spoken.push(text.to_string());
        }
        Ok(())
    }
}

/// A synthesizer that fails its first `failures` calls, then records like
/// [`RecordingSynthesizer`].
#[derive(Clone)]
pub struct FailingSynthesizer {
    remaining_failures: Arc<AtomicUsize>,
    inner: RecordingSynthesizer,
}

impl FailingSynthesizer {
    pub fn times(failures: usize) -> Self {
        Self {
            remaining_failures: Arc::new(AtomicUsize::new(failures)),
            inner: RecordingSynthesizer::new(),
        }
    }

    pub fn always() -> Self {
        Self::times(usize::MAX)
    }

    /// Lines spoken after the failures ran out.
    pub fn spoken(&self) -> Vec<String> {
        self.inner.spoken()
    }
}

#[async_trait]
impl PluginAdapter for FailingSynthesizer {
    fn name(&self) -> &str {
        "failing-tts"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::TextToSpeech
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaraError> {
        Ok(HealthStatus::Unhealthy("scripted failure".into()))
    }
}

#[async_trait]
impl SpeechSynthesizer for FailingSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        profile: &VoiceProfile,
        cancel: &CancellationToken,
    ) -> Result<(), SolaraError> {
        let failed = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            return Err(SolaraError::Synthesis {
                message: "scripted synthesis failure".into(),
                source: None,
            });
        }
        self.inner.synthesize(text, profile, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_recognizer_replays_in_order() {
        let r = ScriptedRecognizer::from_utterances(SpeechTier::Device, ["one", "two"])
            .then_error(RecognitionError::Network);
        let cancel = CancellationToken::new();
        let d = Duration::from_secs(1);

        assert_eq!(r.recognize(d, &cancel).await.unwrap().text, "one");
        assert_eq!(r.recognize(d, &cancel).await.unwrap().text, "two");
        assert!(matches!(
            r.recognize(d, &cancel).await,
            Err(SolaraError::Recognition(RecognitionError::Network))
        ));
        assert!(matches!(
            r.recognize(d, &cancel).await,
            Err(SolaraError::Recognition(RecognitionError::NoSpeech))
        ));
        assert_eq!(r.calls(), 4);
    }

    #[tokio::test]
    async fn failing_synthesizer_recovers_after_failures() {
        let s = FailingSynthesizer::times(1);
        let cancel = CancellationToken::new();
        let profile = VoiceProfile::default();

        assert!(s.synthesize("a", &profile, &cancel).await.is_err());
        s.synthesize("b", &profile, &cancel).await.unwrap();
        assert_eq!(s.spoken(), vec!["b".to_string()]);
    }
}
