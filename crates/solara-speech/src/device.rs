// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-device speech tiers for a terminal host.
//!
//! [`LineRecognizer`] treats a typed line as the recognized utterance and
//! [`ConsoleSynthesizer`] "speaks" by writing the prompt to the terminal.

use std::time::Duration;

use async_trait::async_trait;
use solara_core::{
    AdapterType, HealthStatus, PluginAdapter, RecognitionError, SolaraError, SpeechRecognizer,
    SpeechSynthesizer, SpeechTier, Transcript, VoiceProfile,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::voice::{builtin_voices, select_voice, VoiceInfo};

/// Recognizes typed lines from a reader (normally stdin).
///
/// An empty line is `no-speech`. End of input ends the session and is
/// reported as [`SolaraError::Cancelled`].
pub struct LineRecognizer<R> {
    reader: Mutex<R>,
}

impl<R> LineRecognizer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
        }
    }
}

impl LineRecognizer<tokio::io::BufReader<tokio::io::Stdin>> {
    pub fn stdin() -> Self {
        Self::new(tokio::io::BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R> PluginAdapter for LineRecognizer<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn name(&self) -> &str {
        "device-stt"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SpeechToText
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaraError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl<R> SpeechRecognizer for LineRecognizer<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn tier(&self) -> SpeechTier {
        SpeechTier::Device
    }

    async fn recognize(
        &self,
        max_duration: Duration,
        cancel: &CancellationToken,
    ) -> Result<Transcript, SolaraError> {
        let mut reader = self.reader.lock().await;
        let mut line = String::new();

        let read = tokio::select! {
            _ = cancel.cancelled() => return Err(SolaraError::Cancelled),
            _ = tokio::time::sleep(max_duration) => {
                return Err(RecognitionError::NoSpeech.into());
            }
            read = reader.read_line(&mut line) => read,
        };

        match read {
            Ok(0) => Err(SolaraError::Cancelled),
            Ok(_) => {
                let text = line.trim();
                if text.is_empty() {
                    return Err(RecognitionError::NoSpeech.into());
                }
                Ok(Transcript {
                    text: text.to_string(),
                    confidence: 1.0,
                    tier: SpeechTier::Device,
                })
            }
            Err(_) => Err(RecognitionError::Unsupported.into()),
        }
    }
}

/// Writes spoken prompts to a terminal, prefixed with the selected voice.
pub struct ConsoleSynthesizer<W> {
    writer: Mutex<W>,
    voices: Vec<VoiceInfo>,
}

impl<W> ConsoleSynthesizer<W> {
    pub fn new(writer: W) -> Self {
        Self::with_voices(writer, builtin_voices())
    }

    pub fn with_voices(writer: W, voices: Vec<VoiceInfo>) -> Self {
        Self {
            writer: Mutex::new(writer),
            voices,
        }
    }
}

impl ConsoleSynthesizer<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W> PluginAdapter for ConsoleSynthesizer<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn name(&self) -> &str {
        "device-tts"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::TextToSpeech
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaraError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl<W> SpeechSynthesizer for ConsoleSynthesizer<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn synthesize(
        &self,
        text: &str,
        profile: &VoiceProfile,
        cancel: &CancellationToken,
    ) -> Result<(), SolaraError> {
        if cancel.is_cancelled() {
            return Err(SolaraError::Cancelled);
        }
        let speaker = select_voice(&self.voices, profile)
            .map(|v| v.name.as_str())
            .unwrap_or("Solara");
        let line = format!("{speaker}: {text}\n");

        let mut writer = self.writer.lock().await;
        let write = async {
            writer.write_all(line.as_bytes()).await?;
            writer.flush().await
        };
        write.await.map_err(|e| SolaraError::Synthesis {
            message: format!("failed to write prompt: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solara_core::VoiceGender;

    #[tokio::test]
    async fn typed_lines_become_transcripts() {
        let input: &[u8] = b"I have a freezer\n\n";
        let rec = LineRecognizer::new(tokio::io::BufReader::new(input));
        let cancel = CancellationToken::new();

        let t = rec.recognize(Duration::from_secs(1), &cancel).await.unwrap();
        assert_eq!(t.text, "I have a freezer");
        assert_eq!(t.tier, SpeechTier::Device);

        let err = rec.recognize(Duration::from_secs(1), &cancel).await.unwrap_err();
        assert!(matches!(
            err,
            SolaraError::Recognition(RecognitionError::NoSpeech)
        ));

        let err = rec.recognize(Duration::from_secs(1), &cancel).await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn console_prefixes_selected_voice() {
        let synth = ConsoleSynthesizer::new(Vec::<u8>::new());
        let profile = VoiceProfile {
            language: "en-NG".into(),
            gender: VoiceGender::Female,
            voice_type: "assistant".into(),
        };
        synth
            .synthesize("What appliance?", &profile, &CancellationToken::new())
            .await
            .unwrap();
        let out = synth.writer.lock().await.clone();
        assert_eq!(String::from_utf8(out).unwrap(), "Ada: What appliance?\n");
    }
}
