// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `solara intake`: the voice assistant.
//!
//! Cloud speech tiers are used when enabled and an audio command is
//! configured for them. The device tier is always last: typed lines stand
//! in for on-device recognition and printed lines for on-device synthesis.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use solara_api::OrderSummary;
use solara_config::SolaraConfig;
use solara_core::{SolaraError, SpeechSynthesizer, VoiceGender, VoiceProfile};
use solara_dialogue::{DialogueOutcome, DialogueRunner};
use solara_session::{reduce, Action, AppState, Preferences, View};
use solara_speech::{
    CloudRecognizer, CloudSpeechClient, CloudSynthesizer, CommandMicrophone, CommandPlayer,
    ConsoleSynthesizer, LineRecognizer, RecognizerTier, SpeechIo, TieredRecognizer,
    TieredSynthesizer,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::app::App;
use crate::appliances::describe;

/// Voice overrides for this and later sessions.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct IntakeOptions {
    /// Preferred voice locale, e.g. en-NG. Saved for later sessions.
    #[arg(long)]
    pub language: Option<String>,
    /// Preferred voice gender (female or male). Saved for later sessions.
    #[arg(long)]
    pub gender: Option<VoiceGender>,
}

pub async fn run_intake(app: &App, options: IntakeOptions) -> Result<(), SolaraError> {
    let mut state = open_assistant(app, options).await?;

    let profile = state.preferences.apply(&app.config.speech.voice_profile());
    info!(language = %profile.language, gender = %profile.gender, "starting voice intake");
    let speech = Arc::new(build_speech(&app.config, profile)?);
    let runner = DialogueRunner::new(
        speech.clone(),
        Arc::new(app.recommendation_client()?),
        app.store.clone(),
        &app.config.dialogue,
    );

    println!("{}", state.view.title().bold().green());
    println!("{}\n", "Type your answers. Press Ctrl+D or Ctrl+C to stop.".dimmed());

    let outcome = converse(app, &runner, &speech, &mut state).await;
    speech.stop();
    let saved = app.save_state(&state).await;
    outcome.and(saved)
}

/// Applies voice overrides, switches to the assistant view and saves the
/// result before any speech is set up.
async fn open_assistant(app: &App, options: IntakeOptions) -> Result<AppState, SolaraError> {
    let mut state = app.load_state().await;
    if options.language.is_some() || options.gender.is_some() {
        let preferences = Preferences {
            language: options.language.or(state.preferences.language.clone()),
            voice_gender: options.gender.or(state.preferences.voice_gender),
        };
        state = reduce(state, Action::SetPreferences(preferences));
    }
    state = reduce(state, Action::Navigate(View::VoiceAssistant));
    app.save_state(&state).await?;
    Ok(state)
}

/// Describes appliances until the user declines another or stops.
async fn converse(
    app: &App,
    runner: &DialogueRunner,
    speech: &SpeechIo,
    state: &mut AppState,
) -> Result<(), SolaraError> {
    let mut machine = runner.machine();
    let mut form = app.form().await;
    loop {
        match runner.run(&mut machine, &mut form, &app.cancel).await? {
            DialogueOutcome::Completed {
                record,
                recommendation,
            } => {
                println!("\n{} {}", "saved".green(), describe(&record));
                match recommendation {
                    Ok(result) => {
                        println!("{}", OrderSummary::new(&result));
                        *state = reduce(
                            std::mem::take(state),
                            Action::RecommendationReceived(result),
                        );
                    }
                    Err(e) if e.is_cancelled() => break,
                    Err(e) => {
                        eprintln!("{} {e}", "recommendation failed:".red());
                        eprintln!("Run {} to try again.", "solara recommend".bold());
                    }
                }
            }
            DialogueOutcome::Abandoned { committed } => {
                debug!(?committed, "intake abandoned");
                println!("\n{}", "Stopped. The unfinished appliance was not saved.".yellow());
                break;
            }
        }

        if !wants_another(speech, &app.cancel).await {
            break;
        }
        form.start_new();
    }
    Ok(())
}

async fn wants_another(speech: &SpeechIo, cancel: &CancellationToken) -> bool {
    if speech
        .speak("Would you like to add another appliance?", cancel)
        .await
        .is_err()
    {
        return false;
    }
    match speech.listen(cancel).await {
        Ok(transcript) => is_affirmative(&transcript.text),
        Err(_) => false,
    }
}

fn is_affirmative(text: &str) -> bool {
    let text = text.to_lowercase();
    text.split(|c: char| !c.is_alphanumeric())
        .any(|word| matches!(word, "yes" | "yeah" | "yep" | "sure" | "ok" | "okay" | "another"))
}

/// Builds the recognizer and synthesizer chains from configuration.
pub fn build_speech(config: &SolaraConfig, profile: VoiceProfile) -> Result<SpeechIo, SolaraError> {
    let speech = &config.speech;
    let mut tiers = Vec::new();
    let mut cloud_tts: Option<Arc<dyn SpeechSynthesizer>> = None;

    if speech.cloud_enabled {
        let client = CloudSpeechClient::from_config(&config.backend)?;
        if let Some(command) = &speech.record_command {
            let microphone = Arc::new(CommandMicrophone::new(command, &speech.audio_format));
            tiers.push(RecognizerTier::new(
                Arc::new(CloudRecognizer::new(microphone, client.clone())),
                Duration::from_secs(speech.cloud_listen_secs),
            ));
        }
        if let Some(command) = &speech.player_command {
            cloud_tts = Some(Arc::new(CloudSynthesizer::new(
                client,
                Arc::new(CommandPlayer::new(command)),
            )));
        }
    }
    debug!(
        cloud_stt = !tiers.is_empty(),
        cloud_tts = cloud_tts.is_some(),
        "speech tiers configured"
    );

    tiers.push(RecognizerTier::new(
        Arc::new(LineRecognizer::stdin()),
        Duration::from_secs(speech.device_listen_secs),
    ));

    Ok(SpeechIo::new(
        TieredRecognizer::new(tiers),
        TieredSynthesizer::new(cloud_tts, Arc::new(ConsoleSynthesizer::stdout())),
        profile,
    ))
}
