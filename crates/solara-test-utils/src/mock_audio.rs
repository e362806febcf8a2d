// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock microphone and audio player.
//!
//! `MockMicrophone` counts acquisitions and currently open streams so tests
//! can assert that every exit path released the device.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use solara_core::{
    AudioPlayer, CaptureStream, Microphone, RecognitionError, RecordedAudio, SolaraError,
};

#[derive(Debug, Clone)]
enum Mode {
    Audio(Vec<u8>),
    Silent,
    Denied,
    Hang,
}

/// A microphone double.
#[derive(Clone)]
pub struct MockMicrophone {
    mode: Mode,
    acquisitions: Arc<AtomicUsize>,
    open: Arc<AtomicUsize>,
}

impl MockMicrophone {
    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            acquisitions: Arc::new(AtomicUsize::new(0)),
            open: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every recording yields `bytes`.
    pub fn with_audio(bytes: Vec<u8>) -> Self {
        Self::with_mode(Mode::Audio(bytes))
    }

    /// Every recording fails with `no-speech`.
    pub fn silent() -> Self {
        Self::with_mode(Mode::Silent)
    }

    /// Acquisition fails with `not-allowed`.
    pub fn denied() -> Self {
        Self::with_mode(Mode::Denied)
    }

    /// Recordings run until their ceiling or cancellation, capturing nothing.
    pub fn hanging() -> Self {
        Self::with_mode(Mode::Hang)
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    /// Streams acquired but not yet stopped.
    pub fn open_streams(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

impl Microphone for MockMicrophone {
    fn acquire(&self) -> Result<Box<dyn CaptureStream>, SolaraError> {
        if matches!(self.mode, Mode::Denied) {
            return Err(RecognitionError::NotAllowed.into());
        }
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockStream {
            mode: self.mode.clone(),
            open: self.open.clone(),
            stopped: false,
        }))
    }
}

struct MockStream {
    mode: Mode,
    open: Arc<AtomicUsize>,
    stopped: bool,
}

#[async_trait]
impl CaptureStream for MockStream {
    async fn record(
        &mut self,
        max_duration: Duration,
        cancel: &CancellationToken,
    ) -> Result<RecordedAudio, SolaraError> {
        match &self.mode {
            Mode::Audio(bytes) => Ok(RecordedAudio {
                bytes: bytes.clone(),
                format: "wav".into(),
            }),
            Mode::Silent | Mode::Denied => Err(RecognitionError::NoSpeech.into()),
            Mode::Hang => {
                tokio::select! {
                    _ = cancel.cancelled() => Err(SolaraError::Cancelled),
                    _ = tokio::time::sleep(max_duration) => Err(RecognitionError::NoSpeech.into()),
                }
            }
        }
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.open.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// An audio player that records what it was asked to play.
#[derive(Clone, Default)]
pub struct MockPlayer {
    played: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<Vec<u8>> {
        self.played.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AudioPlayer for MockPlayer {
    async fn play(&self, audio: &[u8], cancel: &CancellationToken) -> Result<(), SolaraError> {
        if cancel.is_cancelled() {
            return Err(SolaraError::Cancelled);
        }
        if let Ok(mut played) = self.played.lock() {
            played.push(audio.to_vec());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stop_is_idempotent() {
        let mic = MockMicrophone::with_audio(vec![1]);
        let mut stream = mic.acquire().unwrap();
        stream.stop();
        stream.stop();
        assert_eq!(mic.open_streams(), 0);
        assert_eq!(mic.acquisitions(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_stream_ends_at_ceiling() {
        let mic = MockMicrophone::hanging();
        let mut stream = mic.acquire().unwrap();
        let err = stream
            .record(Duration::from_secs(10), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SolaraError::Recognition(RecognitionError::NoSpeech)
        ));
        stream.stop();
    }
}
