// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: URL schemes, listening
//! ceilings, and the relationship between the two retry caps.

use crate::diagnostic::ConfigError;
use crate::model::SolaraConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Longest a single listen tier may run, in seconds.
const MAX_LISTEN_SECS: u64 = 60;

/// Validate a deserialized configuration.
///
/// Collects every violation rather than failing fast.
pub fn validate_config(config: &SolaraConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` must be one of: {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    for (key, url) in [
        ("backend.api_base_url", &config.backend.api_base_url),
        ("backend.voice_base_url", &config.backend.voice_base_url),
    ] {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{url}` must start with http:// or https://"),
            });
        }
    }

    if config.backend.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "backend.request_timeout_secs must be at least 1".to_string(),
        });
    }

    for (key, secs) in [
        ("speech.cloud_listen_secs", config.speech.cloud_listen_secs),
        ("speech.device_listen_secs", config.speech.device_listen_secs),
    ] {
        if secs == 0 || secs > MAX_LISTEN_SECS {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be between 1 and {MAX_LISTEN_SECS}, got {secs}"),
            });
        }
    }

    if config.speech.language.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "speech.language must not be empty".to_string(),
        });
    }

    if config.dialogue.max_invalid_retries == 0 {
        errors.push(ConfigError::Validation {
            message: "dialogue.max_invalid_retries must be at least 1".to_string(),
        });
    }

    if config.dialogue.max_no_speech_retries == 0 {
        errors.push(ConfigError::Validation {
            message: "dialogue.max_no_speech_retries must be at least 1".to_string(),
        });
    }

    if config.dialogue.max_no_speech_retries > config.dialogue.max_invalid_retries {
        errors.push(ConfigError::Validation {
            message: format!(
                "dialogue.max_no_speech_retries ({}) must not exceed dialogue.max_invalid_retries ({})",
                config.dialogue.max_no_speech_retries, config.dialogue.max_invalid_retries
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = SolaraConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = SolaraConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "database_path"));
    }

    #[test]
    fn non_http_backend_url_fails_validation() {
        let mut config = SolaraConfig::default();
        config.backend.api_base_url = "ftp://pricing.example".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "backend.api_base_url"));
    }

    #[test]
    fn no_speech_cap_must_not_exceed_invalid_cap() {
        let mut config = SolaraConfig::default();
        config.dialogue.max_invalid_retries = 2;
        config.dialogue.max_no_speech_retries = 3;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "max_no_speech_retries"));
    }

    #[test]
    fn listen_ceiling_is_bounded() {
        let mut config = SolaraConfig::default();
        config.speech.cloud_listen_secs = 0;
        config.speech.device_listen_secs = 120;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn collects_all_errors() {
        let mut config = SolaraConfig::default();
        config.app.log_level = "loud".to_string();
        config.backend.request_timeout_secs = 0;
        config.dialogue.max_invalid_retries = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "log_level"));
        assert!(has_message(&errors, "request_timeout_secs"));
        assert!(has_message(&errors, "max_invalid_retries"));
    }
}
