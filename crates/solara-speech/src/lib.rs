// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech I/O for the Solara voice intake engine.
//!
//! Recognition and synthesis are tiered: a cloud tier backed by the voice
//! service, then an on-device tier. Each tier runs under its own time ceiling
//! and failures fall through to the next tier. [`SpeechIo`] serializes all
//! speech so at most one listen or speak operation is active at a time.

pub mod client;
pub mod command;
pub mod device;
pub mod gate;
pub mod guard;
pub mod recognizer;
pub mod synthesizer;
pub mod voice;

pub use client::CloudSpeechClient;
pub use command::{CommandMicrophone, CommandPlayer};
pub use device::{ConsoleSynthesizer, LineRecognizer};
pub use gate::SpeechIo;
pub use guard::MicrophoneGuard;
pub use recognizer::{CloudRecognizer, RecognizerTier, TieredRecognizer};
pub use synthesizer::{CloudSynthesizer, TieredSynthesizer};
pub use voice::{builtin_voices, select_voice, VoiceInfo};
