// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slot-filling dialogue for the Solara voice intake engine.
//!
//! [`DialogueMachine`] is a pure state machine: it is fed answers and speech
//! failures and returns [`Step`]s describing what to say and whether to
//! listen next. [`DialogueRunner`] drives it one awaited step at a time
//! against real speech I/O, then finalizes the appliance and requests a
//! recommendation.

pub mod machine;
pub mod prompts;
pub mod runner;

pub use machine::{
    default_value, DialogueMachine, DialoguePhase, DialogueState, RetryLimits, Step, StepAction,
};
pub use runner::{DialogueOutcome, DialogueRunner};
