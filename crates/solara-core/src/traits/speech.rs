// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech-to-text and text-to-speech adapter traits.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::SolaraError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{SpeechTier, Transcript, VoiceProfile};

/// One tier of speech recognition (cloud API, on-device engine, ...).
#[async_trait]
pub trait SpeechRecognizer: PluginAdapter {
    /// Which tier this recognizer belongs to.
    fn tier(&self) -> SpeechTier;

    /// Captures and transcribes one utterance.
    ///
    /// Implementations stop on their own once `max_duration` elapses, even
    /// without detected speech, and must release the microphone on every
    /// exit path. When `cancel` fires the call returns
    /// [`SolaraError::Cancelled`].
    async fn recognize(
        &self,
        max_duration: Duration,
        cancel: &CancellationToken,
    ) -> Result<Transcript, SolaraError>;
}

/// One tier of speech synthesis.
#[async_trait]
pub trait SpeechSynthesizer: PluginAdapter {
    /// Speaks `text` and resolves once playback has completed.
    ///
    /// Cancelling `cancel` must stop playback without leaving audio running.
    async fn synthesize(
        &self,
        text: &str,
        profile: &VoiceProfile,
        cancel: &CancellationToken,
    ) -> Result<(), SolaraError>;
}
