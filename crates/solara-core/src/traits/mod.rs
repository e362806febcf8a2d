// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Speech, storage and backend adapters extend [`PluginAdapter`] and use
//! `#[async_trait]` so the engine can hold them as trait objects.

pub mod adapter;
pub mod audio;
pub mod recommendation;
pub mod speech;
pub mod storage;

pub use adapter::PluginAdapter;
pub use audio::{AudioPlayer, CaptureStream, Microphone, RecordedAudio};
pub use recommendation::RecommendationService;
pub use speech::{SpeechRecognizer, SpeechSynthesizer};
pub use storage::KeyValueStore;
