// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Microphone and speaker backed by external commands.
//!
//! The record command writes audio to stdout (e.g. `arecord -q -f S16_LE -r
//! 16000 -t wav`); the player command reads audio from stdin (e.g. `aplay
//! -q`). Both run through `sh -c` and are killed when the operation ends.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use solara_core::{
    AudioPlayer, CaptureStream, Microphone, RecognitionError, RecordedAudio, SolaraError,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).kill_on_drop(true);
    cmd
}

/// A microphone that records by running a shell command.
#[derive(Debug, Clone)]
pub struct CommandMicrophone {
    command: String,
    format: String,
}

impl CommandMicrophone {
    pub fn new(command: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            format: format.into(),
        }
    }
}

impl Microphone for CommandMicrophone {
    fn acquire(&self) -> Result<Box<dyn CaptureStream>, SolaraError> {
        if self.command.trim().is_empty() {
            return Err(RecognitionError::Unsupported.into());
        }
        let child = shell(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::PermissionDenied => SolaraError::from(RecognitionError::NotAllowed),
                _ => SolaraError::from(RecognitionError::Unsupported),
            })?;
        debug!(command = %self.command, "record command started");
        Ok(Box::new(CommandCapture {
            child: Some(child),
            format: self.format.clone(),
        }))
    }
}

struct CommandCapture {
    child: Option<Child>,
    format: String,
}

#[async_trait]
impl CaptureStream for CommandCapture {
    async fn record(
        &mut self,
        max_duration: Duration,
        cancel: &CancellationToken,
    ) -> Result<RecordedAudio, SolaraError> {
        let mut stdout = self
            .child
            .as_mut()
            .and_then(|c| c.stdout.take())
            .ok_or(RecognitionError::Unsupported)?;

        let mut bytes = Vec::new();
        let mut buf = [0u8; 8192];
        let deadline = tokio::time::sleep(max_duration);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    self.stop();
                    return Err(SolaraError::Cancelled);
                }
                _ = &mut deadline => break,
                read = stdout.read(&mut buf) => match read {
                    Ok(0) => break,
                    Ok(n) => bytes.extend_from_slice(&buf[..n]),
                    Err(e) => {
                        warn!(error = %e, "record command output failed");
                        self.stop();
                        return Err(RecognitionError::Unsupported.into());
                    }
                },
            }
        }
        self.stop();

        if bytes.is_empty() {
            return Err(RecognitionError::NoSpeech.into());
        }
        Ok(RecordedAudio {
            bytes,
            format: self.format.clone(),
        })
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take()
            && let Err(e) = child.start_kill()
            && e.kind() != ErrorKind::InvalidInput
        {
            warn!(error = %e, "failed to stop record command");
        }
    }
}

/// Plays audio by piping it into a shell command.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    command: String,
}

impl CommandPlayer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, audio: &[u8], cancel: &CancellationToken) -> Result<(), SolaraError> {
        let synthesis_err = |message: String| SolaraError::Synthesis {
            message,
            source: None,
        };

        let mut child = shell(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| synthesis_err(format!("failed to start player: {e}")))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| synthesis_err("player stdin unavailable".into()))?;

        let playback = async {
            stdin.write_all(audio).await?;
            drop(stdin);
            child.wait().await
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(SolaraError::Cancelled),
            status = playback => {
                let status = status.map_err(|e| synthesis_err(format!("player failed: {e}")))?;
                if status.success() {
                    Ok(())
                } else {
                    Err(synthesis_err(format!("player exited with {status}")))
                }
            }
        }
    }
}
