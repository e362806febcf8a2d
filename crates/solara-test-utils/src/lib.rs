// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Solara integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! microphones, speakers, or backend services.
//!
//! # Components
//!
//! - [`ScriptedRecognizer`] - Recognizer that replays scripted utterances and errors
//! - [`RecordingSynthesizer`] - Synthesizer that captures everything spoken
//! - [`FailingSynthesizer`] - Synthesizer that fails a configurable number of times
//! - [`MockMicrophone`] / [`MockPlayer`] - Audio device doubles
//! - [`MockRecommendationService`] - Recommendation backend with canned results

pub mod mock_audio;
pub mod mock_recommendation;
pub mod mock_speech;

pub use mock_audio::{MockMicrophone, MockPlayer};
pub use mock_recommendation::MockRecommendationService;
pub use mock_speech::{FailingSynthesizer, RecordingSynthesizer, ScriptedRecognizer};
