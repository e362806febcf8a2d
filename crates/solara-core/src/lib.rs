// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Solara voice intake engine.
//!
//! This crate provides the shared data model (appliance records, dialogue
//! field names, recommendation results), the [`SolaraError`] type, and the
//! adapter traits that speech, storage and backend implementations plug into.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{RecognitionError, SolaraError};
pub use types::{
    AdapterType, ApplianceId, ApplianceRecord, Extraction, FieldName, HealthStatus, Pricing,
    QUESTION_ORDER, RecommendationResult, SpeechTier, SystemComponent, Transcript, VoiceGender,
    VoiceProfile,
};

pub use traits::{
    AudioPlayer, CaptureStream, KeyValueStore, Microphone, PluginAdapter, RecommendationService,
    RecordedAudio, SpeechRecognizer, SpeechSynthesizer,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solara_error_has_all_variants() {
        let _config = SolaraError::Config("test".into());
        let _storage = SolaraError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _recognition = SolaraError::Recognition(RecognitionError::NoSpeech);
        let _synthesis = SolaraError::Synthesis {
            message: "test".into(),
            source: None,
        };
        let _backend = SolaraError::Backend {
            status: Some(502),
            message: "bad gateway".into(),
        };
        let _validation = SolaraError::Validation("test".into());
        let _cancelled = SolaraError::Cancelled;
        let _timeout = SolaraError::Timeout {
            duration: std::time::Duration::from_secs(10),
        };
        let _internal = SolaraError::Internal("test".into());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_recognizer<T: SpeechRecognizer>() {}
        fn _assert_synthesizer<T: SpeechSynthesizer>() {}
        fn _assert_microphone<T: Microphone>() {}
        fn _assert_player<T: AudioPlayer>() {}
        fn _assert_store<T: KeyValueStore>() {}
        fn _assert_recommendation<T: RecommendationService>() {}
    }
}
