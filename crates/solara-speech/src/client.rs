// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the voice service's speech endpoints.
//!
//! * `POST {base}/api/voice/stt` takes base64 audio and returns a transcript.
//! * `POST {base}/api/voice/tts` takes text plus a voice profile and returns
//!   raw audio bytes.

use std::time::Duration;

use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use solara_config::model::BackendConfig;
use solara_core::{
    RecognitionError, RecordedAudio, SolaraError, SpeechTier, Transcript, VoiceProfile,
};
use tracing::debug;

/// Request body for cloud speech-to-text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SttRequest<'a> {
    pub audio_data: String,
    pub audio_format: &'a str,
}

/// Response body from cloud speech-to-text.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SttResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Request body for cloud text-to-speech.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsRequest<'a> {
    pub text: &'a str,
    pub voice_type: &'a str,
    pub gender: String,
    pub language: &'a str,
}

/// Client for the voice service's STT and TTS endpoints.
#[derive(Debug, Clone)]
pub struct CloudSpeechClient {
    client: reqwest::Client,
    base_url: String,
}

impl CloudSpeechClient {
    /// Creates a client rooted at `base_url` (scheme and host, no trailing path).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SolaraError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SolaraError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from the `[backend]` config section.
    pub fn from_config(config: &BackendConfig) -> Result<Self, SolaraError> {
        Self::new(
            config.voice_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Transcribes recorded audio.
    ///
    /// Transport failures and non-success statuses map to
    /// [`RecognitionError::Network`]; a successful call that produced no text
    /// maps to [`RecognitionError::NoSpeech`].
    pub async fn transcribe(&self, audio: &RecordedAudio) -> Result<Transcript, SolaraError> {
        let body = SttRequest {
            audio_data: base64::engine::general_purpose::STANDARD.encode(&audio.bytes),
            audio_format: &audio.format,
        };

        let response = self
            .client
            .post(format!("{}/api/voice/stt", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                debug!(error = %e, "STT request failed");
                SolaraError::Recognition(RecognitionError::Network)
            })?;

        let status = response.status();
        debug!(status = %status, bytes = audio.bytes.len(), "STT response received");
        if !status.is_success() {
            return Err(SolaraError::Recognition(RecognitionError::Network));
        }

        let parsed: SttResponse = response.json().await.map_err(|e| {
            debug!(error = %e, "STT response unparseable");
            SolaraError::Recognition(RecognitionError::Network)
        })?;

        match parsed.transcript.map(|t| t.trim().to_string()) {
            Some(text) if parsed.success && !text.is_empty() => Ok(Transcript {
                text,
                confidence: parsed.confidence.unwrap_or(0.0),
                tier: SpeechTier::Cloud,
            }),
            _ => Err(SolaraError::Recognition(RecognitionError::NoSpeech)),
        }
    }

    /// Fetches synthesized audio for `text`.
    pub async fn synthesize_audio(
        &self,
        text: &str,
        profile: &VoiceProfile,
    ) -> Result<Vec<u8>, SolaraError> {
        let body = TtsRequest {
            text,
            voice_type: &profile.voice_type,
            gender: profile.gender.to_string(),
            language: &profile.language,
        };

        let response = self
            .client
            .post(format!("{}/api/voice/tts", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| SolaraError::Synthesis {
                message: format!("TTS request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, chars = text.len(), "TTS response received");
        if !status.is_success() {
            return Err(SolaraError::Synthesis {
                message: format!("TTS service returned {status}"),
                source: None,
            });
        }

        let bytes = response.bytes().await.map_err(|e| SolaraError::Synthesis {
            message: format!("failed to read TTS audio: {e}"),
            source: Some(Box::new(e)),
        })?;
        if bytes.is_empty() {
            return Err(SolaraError::Synthesis {
                message: "TTS service returned no audio".into(),
                source: None,
            });
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solara_core::VoiceGender;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> CloudSpeechClient {
        CloudSpeechClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    fn audio() -> RecordedAudio {
        RecordedAudio {
            bytes: b"RIFF....WAVE".to_vec(),
            format: "wav".into(),
        }
    }

    #[tokio::test]
    async fn transcribe_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/voice/stt"))
            .and(body_partial_json(serde_json::json!({
                "audioData": "UklGRi4uLi5XQVZF",
                "audioFormat": "wav"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "transcript": " I have a freezer ",
                "confidence": 0.92
            })))
            .mount(&server)
            .await;

        let transcript = test_client(&server.uri()).transcribe(&audio()).await.unwrap();
        assert_eq!(transcript.text, "I have a freezer");
        assert_eq!(transcript.tier, SpeechTier::Cloud);
        assert!((transcript.confidence - 0.92).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn empty_transcript_is_no_speech() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/voice/stt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "transcript": ""
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).transcribe(&audio()).await.unwrap_err();
        assert!(matches!(
            err,
            SolaraError::Recognition(RecognitionError::NoSpeech)
        ));
    }

    #[tokio::test]
    async fn server_error_is_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/voice/stt"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = test_client(&server.uri()).transcribe(&audio()).await.unwrap_err();
        assert!(matches!(
            err,
            SolaraError::Recognition(RecognitionError::Network)
        ));
    }

    #[tokio::test]
    async fn synthesize_returns_audio_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/voice/tts"))
            .and(body_partial_json(serde_json::json!({
                "text": "What appliance?",
                "gender": "male",
                "language": "en-NG"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .mount(&server)
            .await;

        let profile = VoiceProfile {
            language: "en-NG".into(),
            gender: VoiceGender::Male,
            voice_type: "assistant".into(),
        };
        let bytes = test_client(&server.uri())
            .synthesize_audio("What appliance?", &profile)
            .await
            .unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn synthesize_non_success_is_synthesis_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/voice/tts"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .synthesize_audio("hello", &VoiceProfile::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SolaraError::Synthesis { .. }));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = test_client("http://localhost:5001/");
        assert_eq!(client.base_url(), "http://localhost:5001");
    }
}
