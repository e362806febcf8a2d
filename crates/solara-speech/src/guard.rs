// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scoped microphone ownership.

use std::time::Duration;

use solara_core::{CaptureStream, Microphone, RecordedAudio, SolaraError};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Holds an open capture stream and stops it when dropped.
///
/// Every exit from a recording (success, error, timeout, cancellation, or the
/// future being dropped mid-await) releases the device.
pub struct MicrophoneGuard {
    stream: Box<dyn CaptureStream>,
}

impl MicrophoneGuard {
    /// Acquires the microphone.
    pub fn acquire(mic: &dyn Microphone) -> Result<Self, SolaraError> {
        let stream = mic.acquire()?;
        trace!("microphone acquired");
        Ok(Self { stream })
    }

    pub async fn record(
        &mut self,
        max_duration: Duration,
        cancel: &CancellationToken,
    ) -> Result<RecordedAudio, SolaraError> {
        self.stream.record(max_duration, cancel).await
    }
}

impl Drop for MicrophoneGuard {
    fn drop(&mut self) {
        self.stream.stop();
        trace!("microphone released");
    }
}
