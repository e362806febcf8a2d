// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw audio capture and playback seams.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::SolaraError;

/// Audio captured from a microphone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAudio {
    pub bytes: Vec<u8>,
    /// Container/codec name sent alongside the audio (`wav`, `webm`, ...).
    pub format: String,
}

/// A process-wide microphone.
pub trait Microphone: Send + Sync {
    /// Opens a capture stream. Fails with a `not-allowed` or `unsupported`
    /// recognition error when the device cannot be opened.
    fn acquire(&self) -> Result<Box<dyn CaptureStream>, SolaraError>;
}

/// An open microphone stream. Must be stopped once the caller is done.
#[async_trait]
pub trait CaptureStream: Send {
    /// Records until `max_duration` elapses, the source ends, or `cancel` fires.
    async fn record(
        &mut self,
        max_duration: Duration,
        cancel: &CancellationToken,
    ) -> Result<RecordedAudio, SolaraError>;

    /// Releases the underlying device. Idempotent.
    fn stop(&mut self);
}

/// Plays synthesized audio bytes.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Plays `audio` to completion, or stops early when `cancel` fires.
    async fn play(&self, audio: &[u8], cancel: &CancellationToken) -> Result<(), SolaraError>;
}
