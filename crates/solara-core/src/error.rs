// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Solara voice intake engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Typed speech recognition failures.
///
/// Every listen tier maps its native failure onto one of these so the
/// dialogue can pick a retry message without inspecting strings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum RecognitionError {
    /// Nothing was heard before the tier's ceiling elapsed.
    NoSpeech,
    /// Microphone permission was refused.
    NotAllowed,
    /// The recognition service could not be reached.
    Network,
    /// No recognizer is available on this host.
    Unsupported,
}

impl RecognitionError {
    /// User-facing retry message for this failure.
    pub fn retry_message(&self) -> &'static str {
        match self {
            RecognitionError::NoSpeech => "I didn't hear anything. Let's try that again.",
            RecognitionError::NotAllowed => {
                "I can't access the microphone. Please allow microphone access and try again."
            }
            RecognitionError::Network => {
                "I'm having trouble reaching the speech service. Let's try again."
            }
            RecognitionError::Unsupported => {
                "Voice input isn't supported here. Please type your answer instead."
            }
        }
    }
}

/// The primary error type used across all Solara crates.
#[derive(Debug, Error)]
pub enum SolaraError {
    /// Configuration errors (invalid TOML, missing required fields, bad URLs).
    #[error("configuration error: {0}")]
    Config(String),

    /// Local storage errors (database open, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Speech-to-text failed on every available tier.
    #[error("speech recognition failed: {0}")]
    Recognition(RecognitionError),

    /// Text-to-speech failed (network, playback, no voice available).
    #[error("speech synthesis failed: {message}")]
    Synthesis {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A backend service answered with a non-success status or an unusable body.
    #[error("backend error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Backend { status: Option<u16>, message: String },

    /// A value failed field validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation was cancelled by the user or by a newer operation.
    #[error("operation cancelled")]
    Cancelled,

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SolaraError {
    /// Returns true when this error is an intentional cancellation that
    /// callers should suppress rather than surface.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SolaraError::Cancelled)
    }
}

impl From<RecognitionError> for SolaraError {
    fn from(kind: RecognitionError) -> Self {
        SolaraError::Recognition(kind)
    }
}
