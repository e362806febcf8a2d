// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Drives a [`DialogueMachine`] with real speech I/O.
//!
//! The runner owns the effects: it speaks each step, listens for the
//! answer, runs extraction, and on completion finalizes the appliance,
//! persists the list and asks the backend for a recommendation.

use std::sync::Arc;
use std::time::Duration;

use solara_config::model::DialogueConfig;
use solara_core::{
    ApplianceRecord, FieldName, KeyValueStore, RecommendationResult, RecommendationService,
    SolaraError,
};
use solara_extract::AttributeExtractor;
use solara_session::ApplianceForm;
use solara_speech::SpeechIo;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::machine::{DialogueMachine, DialoguePhase, RetryLimits, Step, StepAction};

/// How a voice intake session ended.
#[derive(Debug)]
pub enum DialogueOutcome {
    /// Every field was filled and the appliance was finalized.
    Completed {
        record: ApplianceRecord,
        /// The backend's answer for the whole appliance list.
        recommendation: Result<RecommendationResult, SolaraError>,
    },
    /// The session was cancelled. `committed` fields remain in the draft.
    Abandoned { committed: Vec<FieldName> },
}

/// Runs voice intake sessions against a caller-owned [`DialogueMachine`].
///
/// Keeping the machine between [`run`](Self::run) calls lets a cancelled
/// session resume at the first unanswered field.
pub struct DialogueRunner {
    speech: Arc<SpeechIo>,
    extractor: AttributeExtractor,
    recommender: Arc<dyn RecommendationService>,
    store: Arc<dyn KeyValueStore>,
    limits: RetryLimits,
    question_delay: Duration,
}

impl DialogueRunner {
    pub fn new(
        speech: Arc<SpeechIo>,
        recommender: Arc<dyn RecommendationService>,
        store: Arc<dyn KeyValueStore>,
        config: &DialogueConfig,
    ) -> Self {
        Self {
            speech,
            extractor: AttributeExtractor::new(),
            recommender,
            store,
            limits: RetryLimits::from(config),
            question_delay: Duration::from_millis(config.question_delay_ms),
        }
    }

    /// Overrides the pause between an acknowledgement and the next question.
    pub fn with_question_delay(mut self, delay: Duration) -> Self {
        self.question_delay = delay;
        self
    }

    /// A fresh machine using this runner's retry limits.
    pub fn machine(&self) -> DialogueMachine {
        DialogueMachine::new(self.limits)
    }

    /// Asks for every field of the draft in `form` until it is complete or
    /// `cancel` fires.
    ///
    /// A machine left by a cancelled run picks up where it stopped; one that
    /// finished is reset for the next appliance. Errors are only returned for
    /// failures the dialogue cannot recover from; recognition and synthesis
    /// problems are retried internally.
    pub async fn run(
        &self,
        machine: &mut DialogueMachine,
        form: &mut ApplianceForm,
        cancel: &CancellationToken,
    ) -> Result<DialogueOutcome, SolaraError> {
        if machine.state().phase == DialoguePhase::Finished {
            machine.reset();
        }
        let mut step = machine.start();
        info!(resumed = !machine.answered().is_empty(), "voice intake started");

        loop {
            if cancel.is_cancelled() {
                return Ok(self.abandon(machine));
            }

            match self.say(&step, cancel).await {
                Ok(()) => {}
                Err(SolaraError::Cancelled) => return Ok(self.abandon(machine)),
                Err(e) if matches!(step.action, StepAction::Listen(_)) => {
                    warn!(error = %e, "speaking failed");
                    step = machine.on_speech_failure(form);
                    continue;
                }
                Err(e) => warn!(error = %e, "closing remarks could not be spoken"),
            }

            let field = match step.action {
                StepAction::Listen(field) => field,
                StepAction::Finish => break,
                StepAction::Stop => return Ok(self.abandon(machine)),
            };

            machine.on_prompted();
            step = match self.speech.listen(cancel).await {
                Ok(transcript) => {
                    debug!(field = %field, text = %transcript.text, "heard answer");
                    let extractions = self.extractor.resolve(&transcript.text, Some(field));
                    machine.on_answer(form, &extractions)
                }
                Err(SolaraError::Recognition(kind)) => machine.on_no_speech(form, kind),
                Err(SolaraError::Cancelled) => return Ok(self.abandon(machine)),
                Err(e) => {
                    self.speech.stop();
                    machine.cancel();
                    return Err(e);
                }
            };

            if let StepAction::Listen(next) = step.action
                && next != field
                && !self.pause(cancel).await
            {
                return Ok(self.abandon(machine));
            }
        }

        self.complete(form, cancel).await
    }

    async fn say(&self, step: &Step, cancel: &CancellationToken) -> Result<(), SolaraError> {
        for line in &step.speech {
            self.speech.speak(line, cancel).await?;
        }
        Ok(())
    }

    /// Returns `false` if cancelled during the pause.
    async fn pause(&self, cancel: &CancellationToken) -> bool {
        if self.question_delay.is_zero() {
            return true;
        }
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.question_delay) => true,
        }
    }

    async fn complete(
        &self,
        form: &mut ApplianceForm,
        cancel: &CancellationToken,
    ) -> Result<DialogueOutcome, SolaraError> {
        let record = form.finalize()?;
        if let Err(e) = form.persist(self.store.as_ref()).await {
            warn!(error = %e, "could not persist appliance list");
        }

        let recommendation = self.recommender.recommend(form.records(), cancel).await;
        match &recommendation {
            Ok(result) => info!(
                components = result.components.len(),
                total = result.pricing.total_amount,
                "recommendation received"
            ),
            Err(e) => warn!(error = %e, "recommendation failed"),
        }
        Ok(DialogueOutcome::Completed {
            record,
            recommendation,
        })
    }

    fn abandon(&self, machine: &mut DialogueMachine) -> DialogueOutcome {
        self.speech.stop();
        machine.cancel();
        let committed = machine.answered();
        info!(committed = committed.len(), "voice intake abandoned");
        DialogueOutcome::Abandoned { committed }
    }
}
