// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently ignored.

use serde::{Deserialize, Serialize};
use solara_core::{VoiceGender, VoiceProfile};

/// Top-level Solara configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SolaraConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Speech-to-text and text-to-speech tiers.
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Intake dialogue retry and pacing policy.
    #[serde(default)]
    pub dialogue: DialogueConfig,

    /// Local storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Backend service endpoints.
    #[serde(default)]
    pub backend: BackendConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name used in prompts and the CLI banner.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "solara".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Speech tier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SpeechConfig {
    /// Try the cloud STT/TTS tier before falling back to on-device speech.
    #[serde(default = "default_true")]
    pub cloud_enabled: bool,

    /// Recording ceiling for the cloud recognition tier, in seconds.
    #[serde(default = "default_cloud_listen_secs")]
    pub cloud_listen_secs: u64,

    /// Listening ceiling for the on-device recognition tier, in seconds.
    #[serde(default = "default_device_listen_secs")]
    pub device_listen_secs: u64,

    /// Preferred voice locale (BCP-47).
    #[serde(default = "default_language")]
    pub language: String,

    /// Preferred voice gender.
    #[serde(default = "default_gender")]
    pub gender: VoiceGender,

    /// Voice style requested from the cloud TTS service.
    #[serde(default = "default_voice_type")]
    pub voice_type: String,

    /// Audio format label sent with recorded audio.
    #[serde(default = "default_audio_format")]
    pub audio_format: String,

    /// Shell command that records audio to stdout, e.g. `arecord -q -f S16_LE -r 16000 -t wav`.
    /// `None` disables the cloud recognition tier.
    #[serde(default)]
    pub record_command: Option<String>,

    /// Shell command that plays audio read from stdin, e.g. `aplay -q`.
    /// `None` disables the cloud synthesis tier.
    #[serde(default)]
    pub player_command: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            cloud_enabled: true,
            cloud_listen_secs: default_cloud_listen_secs(),
            device_listen_secs: default_device_listen_secs(),
            language: default_language(),
            gender: default_gender(),
            voice_type: default_voice_type(),
            audio_format: default_audio_format(),
            record_command: None,
            player_command: None,
        }
    }
}

impl SpeechConfig {
    /// The voice preference passed to every `speak` call.
    pub fn voice_profile(&self) -> VoiceProfile {
        VoiceProfile {
            language: self.language.clone(),
            gender: self.gender,
            voice_type: self.voice_type.clone(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cloud_listen_secs() -> u64 {
    10
}

fn default_device_listen_secs() -> u64 {
    7
}

fn default_language() -> String {
    "en-NG".to_string()
}

fn default_gender() -> VoiceGender {
    VoiceGender::Female
}

fn default_voice_type() -> String {
    "assistant".to_string()
}

fn default_audio_format() -> String {
    "wav".to_string()
}

/// Intake dialogue policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DialogueConfig {
    /// Attempts allowed for an unusable answer before the field is defaulted.
    #[serde(default = "default_max_invalid_retries")]
    pub max_invalid_retries: u32,

    /// Attempts allowed when nothing was heard before the field is defaulted.
    #[serde(default = "default_max_no_speech_retries")]
    pub max_no_speech_retries: u32,

    /// Pause between a confirmation and the next question, in milliseconds.
    #[serde(default = "default_question_delay_ms")]
    pub question_delay_ms: u64,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            max_invalid_retries: default_max_invalid_retries(),
            max_no_speech_retries: default_max_no_speech_retries(),
            question_delay_ms: default_question_delay_ms(),
        }
    }
}

fn default_max_invalid_retries() -> u32 {
    3
}

fn default_max_no_speech_retries() -> u32 {
    2
}

fn default_question_delay_ms() -> u64 {
    600
}

/// Local storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite file backing local storage.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("solara").join("solara.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "solara.db".to_string())
}

/// Backend service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the recommendation/pricing API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL of the voice service (STT, TTS, conversation).
    #[serde(default = "default_voice_base_url")]
    pub voice_base_url: String,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            voice_base_url: default_voice_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_voice_base_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}
