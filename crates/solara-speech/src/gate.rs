// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide single-operation gate for speech.
//!
//! Starting a listen or speak operation cancels whatever operation was
//! active. Nothing queues: the newest request always wins.

use std::sync::Mutex;

use solara_core::{SolaraError, Transcript, VoiceProfile};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::recognizer::TieredRecognizer;
use crate::synthesizer::TieredSynthesizer;

#[derive(Default)]
struct ActiveOperation {
    generation: u64,
    token: Option<CancellationToken>,
}

/// Owns the recognizer and synthesizer chains and allows one operation at a time.
pub struct SpeechIo {
    recognizer: TieredRecognizer,
    synthesizer: TieredSynthesizer,
    profile: VoiceProfile,
    active: Mutex<ActiveOperation>,
}

impl SpeechIo {
    pub fn new(
        recognizer: TieredRecognizer,
        synthesizer: TieredSynthesizer,
        profile: VoiceProfile,
    ) -> Self {
        Self {
            recognizer,
            synthesizer,
            profile,
            active: Mutex::new(ActiveOperation::default()),
        }
    }

    pub fn profile(&self) -> &VoiceProfile {
        &self.profile
    }

    /// Captures one utterance, cancelling any active operation first.
    pub async fn listen(&self, parent: &CancellationToken) -> Result<Transcript, SolaraError> {
        let (generation, token) = self.begin(parent, "listen");
        let result = self.recognizer.listen(&token).await;
        self.finish(generation);
        result
    }

    /// Speaks `text` with the configured voice, cancelling any active operation first.
    pub async fn speak(&self, text: &str, parent: &CancellationToken) -> Result<(), SolaraError> {
        let (generation, token) = self.begin(parent, "speak");
        let result = self.synthesizer.speak(text, &self.profile, &token).await;
        self.finish(generation);
        result
    }

    /// Cancels the active operation, if any. Returns immediately.
    pub fn stop(&self) {
        if let Ok(mut active) = self.active.lock()
            && let Some(token) = active.token.take()
        {
            token.cancel();
            debug!(generation = active.generation, "speech operation stopped");
        }
    }

    /// Whether a listen or speak operation is in flight.
    pub fn is_active(&self) -> bool {
        self.active
            .lock()
            .map(|a| a.token.is_some())
            .unwrap_or(false)
    }

    fn begin(&self, parent: &CancellationToken, op: &'static str) -> (u64, CancellationToken) {
        let token = parent.child_token();
        let mut active = match self.active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = active.token.replace(token.clone()) {
            previous.cancel();
            debug!(op, "superseded active speech operation");
        }
        active.generation += 1;
        (active.generation, token)
    }

    fn finish(&self, generation: u64) {
        if let Ok(mut active) = self.active.lock()
            && active.generation == generation
        {
            active.token = None;
        }
    }
}
