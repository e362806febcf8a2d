// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure slot-filling state machine.
//!
//! Phases: `Idle -> Asking(f) -> AwaitingAnswer(f) -> Validating(f) ->
//! Asking(next) | Finished`. A rejected answer goes back to `Asking(f)`
//! until the retry limit, then the field's default is committed and the
//! machine advances. `cancel()` returns to `Idle` from anywhere.
//!
//! The machine performs no I/O. Committing goes through
//! [`ApplianceForm::set`], the one mutator of the draft.

use std::collections::BTreeSet;

use solara_config::model::DialogueConfig;
use solara_core::{FieldName, RecognitionError, QUESTION_ORDER};
use solara_extract::Extractions;
use solara_session::ApplianceForm;
use tracing::{debug, info, warn};

use crate::prompts;

/// Where the dialogue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialoguePhase {
    Idle,
    /// The question for the field is being spoken.
    Asking(FieldName),
    /// The question was spoken; waiting for the user.
    AwaitingAnswer(FieldName),
    /// An answer arrived and is being checked.
    Validating(FieldName),
    /// Every field has a value. Inert until [`DialogueMachine::reset`].
    Finished,
}

impl std::fmt::Display for DialoguePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialoguePhase::Idle => write!(f, "idle"),
            DialoguePhase::Asking(field) => write!(f, "asking({field})"),
            DialoguePhase::AwaitingAnswer(field) => write!(f, "awaiting-answer({field})"),
            DialoguePhase::Validating(field) => write!(f, "validating({field})"),
            DialoguePhase::Finished => write!(f, "finished"),
        }
    }
}

/// Observable dialogue state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueState {
    pub phase: DialoguePhase,
    pub current_field: Option<FieldName>,
    /// Failed attempts at the current field. Never exceeds the active limit.
    pub retry_count: u32,
    /// The last recognition failure for the current field, if any.
    pub recognition_error: Option<RecognitionError>,
}

impl Default for DialogueState {
    fn default() -> Self {
        Self {
            phase: DialoguePhase::Idle,
            current_field: None,
            retry_count: 0,
            recognition_error: None,
        }
    }
}

/// How many failed attempts a field gets before its default is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryLimits {
    pub invalid: u32,
    pub no_speech: u32,
}

impl Default for RetryLimits {
    fn default() -> Self {
        Self {
            invalid: 3,
            no_speech: 2,
        }
    }
}

impl From<&DialogueConfig> for RetryLimits {
    fn from(config: &DialogueConfig) -> Self {
        Self {
            invalid: config.max_invalid_retries.max(1),
            no_speech: config.max_no_speech_retries.max(1),
        }
    }
}

/// What the runner does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// Speak, then listen for an answer to this field.
    Listen(FieldName),
    /// Speak, then finalize the appliance.
    Finish,
    /// Nothing more to do.
    Stop,
}

/// Utterances to speak in order, followed by an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub speech: Vec<String>,
    pub action: StepAction,
}

impl Step {
    fn stop() -> Self {
        Self {
            speech: Vec::new(),
            action: StepAction::Stop,
        }
    }
}

/// Value committed when a field runs out of retries.
pub fn default_value(field: FieldName) -> &'static str {
    match field {
        FieldName::Name => "Appliance",
        FieldName::Quantity => "1",
        FieldName::DayHours => "8",
        FieldName::NightHours => "0",
        FieldName::Wattage => "100",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Invalid,
    NoSpeech(RecognitionError),
}

/// The slot-filling state machine.
#[derive(Debug, Clone)]
pub struct DialogueMachine {
    limits: RetryLimits,
    state: DialogueState,
    answered: BTreeSet<FieldName>,
    defaulted: BTreeSet<FieldName>,
    speech_failures: u32,
}

impl DialogueMachine {
    pub fn new(limits: RetryLimits) -> Self {
        Self {
            limits,
            state: DialogueState::default(),
            answered: BTreeSet::new(),
            defaulted: BTreeSet::new(),
            speech_failures: 0,
        }
    }

    pub fn state(&self) -> &DialogueState {
        &self.state
    }

    pub fn limits(&self) -> RetryLimits {
        self.limits
    }

    /// Fields committed so far, in question order.
    pub fn answered(&self) -> Vec<FieldName> {
        self.answered.iter().copied().collect()
    }

    /// Fields that were filled with their default.
    pub fn defaulted(&self) -> Vec<FieldName> {
        self.defaulted.iter().copied().collect()
    }

    /// Starts (or resumes after a cancel) by asking the first unanswered field.
    pub fn start(&mut self) -> Step {
        if self.state.phase == DialoguePhase::Finished {
            return Step::stop();
        }
        self.clear_attempts();
        match self.next_unanswered() {
            Some(field) => {
                let mut step = self.ask(field, prompts::question(field));
                if self.answered.is_empty() {
                    step.speech.insert(0, prompts::GREETING.to_string());
                }
                step
            }
            None => self.finish(Vec::new()),
        }
    }

    /// Forgets everything so a new appliance can be described.
    pub fn reset(&mut self) {
        self.state = DialogueState::default();
        self.answered.clear();
        self.defaulted.clear();
        self.speech_failures = 0;
    }

    /// The question for the current field was spoken successfully.
    pub fn on_prompted(&mut self) {
        if let DialoguePhase::Asking(field) = self.state.phase {
            self.speech_failures = 0;
            self.state.phase = DialoguePhase::AwaitingAnswer(field);
        }
    }

    /// Handles the fields extracted from an answer to the current question.
    ///
    /// A valid value for the current field is committed together with any
    /// other fields the same utterance bound that are still unanswered.
    pub fn on_answer(&mut self, form: &mut ApplianceForm, extractions: &Extractions) -> Step {
        let Some(field) = self.awaiting() else {
            return Step::stop();
        };
        self.state.phase = DialoguePhase::Validating(field);

        let accepted = extractions
            .get(field)
            .filter(|value| match form.set(field, value) {
                Ok(()) => true,
                Err(e) => {
                    debug!(field = %field, error = %e, "answer rejected");
                    false
                }
            })
            .map(str::to_string);

        let Some(value) = accepted else {
            return self.fail(form, field, Failure::Invalid);
        };

        self.answered.insert(field);
        let mut speech = vec![prompts::confirm(field, &value)];
        for extraction in extractions.iter() {
            let other = extraction.field;
            if other == field || self.answered.contains(&other) {
                continue;
            }
            if form.set(other, &extraction.value).is_ok() {
                self.answered.insert(other);
                speech.push(prompts::confirm(other, &extraction.value));
                debug!(field = %other, "co-bound field committed");
            }
        }
        info!(field = %field, value = %value, "field answered");
        self.advance(speech)
    }

    /// Handles a recognition failure while waiting for an answer.
    pub fn on_no_speech(&mut self, form: &mut ApplianceForm, kind: RecognitionError) -> Step {
        let Some(field) = self.awaiting() else {
            return Step::stop();
        };
        self.state.recognition_error = Some(kind);
        self.fail(form, field, Failure::NoSpeech(kind))
    }

    /// Handles a synthesis failure while asking.
    ///
    /// The first failure re-asks with a recovery utterance; a second
    /// consecutive failure commits the default and advances.
    pub fn on_speech_failure(&mut self, form: &mut ApplianceForm) -> Step {
        let DialoguePhase::Asking(field) = self.state.phase else {
            return Step::stop();
        };
        self.speech_failures += 1;
        warn!(field = %field, failures = self.speech_failures, "prompt could not be spoken");
        if self.speech_failures >= 2 {
            self.speech_failures = 0;
            return self.apply_default(form, field);
        }
        self.ask(field, prompts::question(field))
            .with_preface(prompts::RECOVERY)
    }

    /// Abandons the dialogue. Committed fields stay committed.
    pub fn cancel(&mut self) {
        debug!(phase = %self.state.phase, "dialogue cancelled");
        self.state.phase = DialoguePhase::Idle;
        self.state.current_field = None;
        self.clear_attempts();
    }

    fn awaiting(&self) -> Option<FieldName> {
        match self.state.phase {
            DialoguePhase::Asking(field)
            | DialoguePhase::AwaitingAnswer(field)
            | DialoguePhase::Validating(field) => Some(field),
            DialoguePhase::Idle | DialoguePhase::Finished => None,
        }
    }

    fn fail(&mut self, form: &mut ApplianceForm, field: FieldName, failure: Failure) -> Step {
        let limit = match failure {
            Failure::Invalid => self.limits.invalid,
            Failure::NoSpeech(_) => self.limits.no_speech,
        };
        self.state.retry_count = (self.state.retry_count + 1).min(limit);
        debug!(
            field = %field,
            retry_count = self.state.retry_count,
            limit,
            "answer missing or invalid"
        );

        if self.state.retry_count >= limit {
            return self.apply_default(form, field);
        }

        let prompt = if self.state.retry_count == 1 {
            prompts::question(field)
        } else {
            prompts::directive(field)
        };
        let step = self.ask(field, prompt);
        match failure {
            Failure::Invalid if self.state.retry_count > 1 => step,
            Failure::Invalid => step.with_preface(prompts::NOT_CAUGHT),
            Failure::NoSpeech(kind) => step.with_preface(kind.retry_message()),
        }
    }

    fn apply_default(&mut self, form: &mut ApplianceForm, field: FieldName) -> Step {
        let value = default_value(field);
        if let Err(e) = form.set(field, value) {
            warn!(field = %field, error = %e, "default value rejected");
        }
        self.answered.insert(field);
        self.defaulted.insert(field);
        info!(field = %field, value, "field defaulted");
        self.advance(vec![prompts::announce_default(field, value)])
    }

    fn advance(&mut self, speech: Vec<String>) -> Step {
        self.clear_attempts();
        match self.next_unanswered() {
            Some(next) => {
                let mut step = self.ask(next, prompts::question(next));
                let mut all = speech;
                all.append(&mut step.speech);
                step.speech = all;
                step
            }
            None => self.finish(speech),
        }
    }

    fn finish(&mut self, mut speech: Vec<String>) -> Step {
        self.state.phase = DialoguePhase::Finished;
        self.state.current_field = None;
        speech.push(prompts::FINISHED.to_string());
        info!(defaulted = self.defaulted.len(), "dialogue finished");
        Step {
            speech,
            action: StepAction::Finish,
        }
    }

    fn ask(&mut self, field: FieldName, prompt: &str) -> Step {
        self.state.phase = DialoguePhase::Asking(field);
        self.state.current_field = Some(field);
        Step {
            speech: vec![prompt.to_string()],
            action: StepAction::Listen(field),
        }
    }

    fn clear_attempts(&mut self) {
        self.state.retry_count = 0;
        self.state.recognition_error = None;
    }

    fn next_unanswered(&self) -> Option<FieldName> {
        QUESTION_ORDER
            .iter()
            .copied()
            .find(|f| !self.answered.contains(f))
    }
}

impl Step {
    fn with_preface(mut self, preface: &str) -> Self {
        self.speech.insert(0, preface.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use solara_extract::AttributeExtractor;
    use tracing_test::traced_test;

    fn answer(m: &mut DialogueMachine, form: &mut ApplianceForm, text: &str) -> Step {
        m.on_prompted();
        let target = m.state().current_field;
        let ex = AttributeExtractor::new().resolve(text, target);
        m.on_answer(form, &ex)
    }

    #[test]
    fn start_asks_for_the_name() {
        let mut m = DialogueMachine::new(RetryLimits::default());
        let step = m.start();
        assert_eq!(step.action, StepAction::Listen(FieldName::Name));
        assert_eq!(step.speech.last().unwrap(), prompts::question(FieldName::Name));
        assert_eq!(m.state().phase, DialoguePhase::Asking(FieldName::Name));
        m.on_prompted();
        assert_eq!(m.state().phase, DialoguePhase::AwaitingAnswer(FieldName::Name));
    }

    #[test]
    fn valid_answer_advances_and_confirms() {
        let mut m = DialogueMachine::new(RetryLimits::default());
        let mut form = ApplianceForm::new();
        m.start();
        let step = answer(&mut m, &mut form, "I have a freezer");
        assert_eq!(step.action, StepAction::Listen(FieldName::Quantity));
        assert_eq!(step.speech[0], "Great, a freezer.");
        assert_eq!(form.get().name.as_deref(), Some("freezer"));
        assert_eq!(m.state().retry_count, 0);
    }

    #[test]
    fn co_bound_hours_skip_the_night_question() {
        let mut m = DialogueMachine::new(RetryLimits::default());
        let mut form = ApplianceForm::new();
        m.start();
        answer(&mut m, &mut form, "a fridge");
        answer(&mut m, &mut form, "one");
        let step = answer(&mut m, &mut form, "it runs 24 hours");
        assert_eq!(step.action, StepAction::Listen(FieldName::Wattage));
        assert_eq!(form.get().day_hours, 12.0);
        assert_eq!(form.get().night_hours, 12.0);
    }

    #[test]
    fn invalid_answers_escalate_then_default() {
        let mut m = DialogueMachine::new(RetryLimits::default());
        let mut form = ApplianceForm::new();
        m.start();

        let first = answer(&mut m, &mut form, "hmm");
        assert_eq!(first.action, StepAction::Listen(FieldName::Name));
        assert_eq!(first.speech, vec![prompts::NOT_CAUGHT, prompts::question(FieldName::Name)]);
        assert_eq!(m.state().retry_count, 1);

        let second = answer(&mut m, &mut form, "what");
        assert_eq!(second.speech, vec![prompts::directive(FieldName::Name)]);
        assert_eq!(m.state().retry_count, 2);

        let third = answer(&mut m, &mut form, "no clue");
        assert_eq!(third.action, StepAction::Listen(FieldName::Quantity));
        assert!(third.speech[0].contains("Appliance"));
        assert_eq!(form.get().name.as_deref(), Some("Appliance"));
        assert_eq!(m.defaulted(), vec![FieldName::Name]);
        assert_eq!(m.state().retry_count, 0);
    }

    #[test]
    fn no_speech_has_a_smaller_cap() {
        let mut m = DialogueMachine::new(RetryLimits::default());
        let mut form = ApplianceForm::new();
        m.start();
        m.on_prompted();

        let step = m.on_no_speech(&mut form, RecognitionError::NoSpeech);
        assert_eq!(step.action, StepAction::Listen(FieldName::Name));
        assert_eq!(step.speech[0], RecognitionError::NoSpeech.retry_message());
        assert_eq!(m.state().recognition_error, Some(RecognitionError::NoSpeech));

        m.on_prompted();
        let step = m.on_no_speech(&mut form, RecognitionError::NoSpeech);
        assert_eq!(step.action, StepAction::Listen(FieldName::Quantity));
        assert_eq!(form.get().name.as_deref(), Some("Appliance"));
        assert_eq!(m.state().recognition_error, None);
    }

    #[test]
    fn second_consecutive_speech_failure_defaults() {
        let mut m = DialogueMachine::new(RetryLimits::default());
        let mut form = ApplianceForm::new();
        m.start();

        let step = m.on_speech_failure(&mut form);
        assert_eq!(step.speech[0], prompts::RECOVERY);
        assert_eq!(step.action, StepAction::Listen(FieldName::Name));

        let step = m.on_speech_failure(&mut form);
        assert_eq!(step.action, StepAction::Listen(FieldName::Quantity));
        assert_eq!(form.get().name.as_deref(), Some("Appliance"));
    }

    #[test]
    fn cancel_keeps_committed_fields_and_resumes() {
        let mut m = DialogueMachine::new(RetryLimits::default());
        let mut form = ApplianceForm::new();
        m.start();
        answer(&mut m, &mut form, "two fans");
        answer(&mut m, &mut form, "blah");
        assert_eq!(m.state().retry_count, 1);

        m.cancel();
        assert_eq!(m.state().phase, DialoguePhase::Idle);
        assert_eq!(m.state().retry_count, 0);
        assert_eq!(form.get().name.as_deref(), Some("fan"));
        assert_eq!(form.get().quantity, 2);

        let step = m.start();
        assert_eq!(step.action, StepAction::Listen(FieldName::DayHours));
        assert!(!step.speech.contains(&prompts::GREETING.to_string()));
    }

    #[test]
    fn three_bad_wattage_answers_default_and_finish() {
        let mut m = DialogueMachine::new(RetryLimits::default());
        let mut form = ApplianceForm::new();
        m.start();
        answer(&mut m, &mut form, "I have a freezer");
        answer(&mut m, &mut form, "2");
        answer(&mut m, &mut form, "it runs 24 hours");
        answer(&mut m, &mut form, "umm");
        answer(&mut m, &mut form, "not sure");
        let step = answer(&mut m, &mut form, "no idea");

        assert_eq!(step.action, StepAction::Finish);
        assert_eq!(form.get().wattage, Some(100.0));
        assert_eq!(m.state().phase, DialoguePhase::Finished);
        assert_eq!(
            m.on_answer(&mut form, &Extractions::default()).action,
            StepAction::Stop
        );
    }

    #[test]
    #[traced_test]
    fn defaulting_is_logged() {
        let mut m = DialogueMachine::new(RetryLimits { invalid: 1, no_speech: 1 });
        let mut form = ApplianceForm::new();
        m.start();
        answer(&mut m, &mut form, "pardon");
        assert!(logs_contain("field defaulted"));
    }

    #[derive(Debug, Clone)]
    enum Event {
        Garbage,
        Silence,
        TtsFailure,
        Good,
    }

    fn event() -> impl Strategy<Value = Event> {
        prop_oneof![
            Just(Event::Garbage),
            Just(Event::Silence),
            Just(Event::TtsFailure),
            Just(Event::Good),
        ]
    }

    proptest! {
        #[test]
        fn retry_count_is_bounded_and_defaults_are_never_empty(
            events in prop::collection::vec(event(), 0..60),
            invalid in 1u32..5,
            no_speech in 1u32..5,
        ) {
            let limits = RetryLimits { invalid, no_speech };
            let mut m = DialogueMachine::new(limits);
            let mut form = ApplianceForm::new();
            let mut step = m.start();
            let good = |f: FieldName| match f {
                FieldName::Name => "a television",
                FieldName::Quantity => "3",
                FieldName::DayHours => "5",
                FieldName::NightHours => "2",
                FieldName::Wattage => "120",
            };

            for ev in events {
                let StepAction::Listen(field) = step.action else { break };
                step = match ev {
                    Event::TtsFailure => m.on_speech_failure(&mut form),
                    Event::Silence => {
                        m.on_prompted();
                        m.on_no_speech(&mut form, RecognitionError::NoSpeech)
                    }
                    Event::Garbage => answer(&mut m, &mut form, "mumble"),
                    Event::Good => answer(&mut m, &mut form, good(field)),
                };
                prop_assert!(m.state().retry_count <= limits.invalid.max(limits.no_speech));
                if let Some(current) = m.state().current_field {
                    prop_assert!(!m.defaulted().contains(&current));
                }
                for f in m.defaulted() {
                    prop_assert!(form.get().field_value(f).is_some_and(|v| !v.is_empty()));
                }
            }
        }
    }
}
