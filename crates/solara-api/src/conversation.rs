// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational turns against the voice service.
//!
//! The assistant replies in free text and may return `fill_field` actions
//! that are applied to the in-progress appliance draft.

use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use solara_config::model::BackendConfig;
use solara_core::types::format_number;
use solara_core::{FieldName, SolaraError};
use solara_session::ApplianceForm;
use tracing::{debug, warn};

use crate::wire::{
    ConversationAction, ConversationRequest, ConversationResponse, ConversationTurn, ErrorBody,
};

/// Client for `POST {voice_base}/api/voice/conversation`.
///
/// Keeps the session id and running history so consecutive turns share
/// context.
pub struct ConversationClient {
    client: reqwest::Client,
    base_url: String,
    session_id: String,
    history: Vec<ConversationTurn>,
}

impl ConversationClient {
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
            session_id: uuid::Uuid::new_v4().to_string(),
            history: Vec::new(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, SolaraError> {
        Self::new(
            config.voice_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Sends `message` with `context` and records the exchange in the history.
    pub async fn send(
        &mut self,
        message: &str,
        context: serde_json::Value,
    ) -> Result<ConversationResponse, SolaraError> {
        let request = ConversationRequest {
            user_message: message.to_string(),
            context,
            session_id: self.session_id.clone(),
            conversation_history: self.history.clone(),
        };
        let response = self.turn(&request).await?;

        self.history.push(ConversationTurn {
            role: "user".into(),
            content: message.to_string(),
        });
        self.history.push(ConversationTurn {
            role: "assistant".into(),
            content: response.response.clone(),
        });
        Ok(response)
    }

    /// Runs one conversational turn.
    pub async fn turn(
        &self,
        request: &ConversationRequest,
    ) -> Result<ConversationResponse, SolaraError> {
        let response = self
            .client
            .post(format!("{}/api/voice/conversation", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| SolaraError::Backend {
                status: None,
                message: format!("could not reach the voice service: {e}"),
            })?;

        let status = response.status();
        debug!(status = %status, session_id = %request.session_id, "conversation response received");

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| format!("conversation request failed with {status}"));
            return Err(SolaraError::Backend {
                status: Some(status.as_u16()),
                message,
            });
        }

        let parsed: ConversationResponse =
            response.json().await.map_err(|e| SolaraError::Backend {
                status: Some(status.as_u16()),
                message: format!("unexpected conversation response: {e}"),
            })?;

        if !parsed.success {
            return Err(SolaraError::Backend {
                status: Some(status.as_u16()),
                message: if parsed.response.is_empty() {
                    "the assistant could not answer".into()
                } else {
                    parsed.response
                },
            });
        }
        Ok(parsed)
    }
}

fn parse_field(name: &str) -> Option<FieldName> {
    match name {
        "nameOfItem" | "appliance" => Some(FieldName::Name),
        "day_hours" => Some(FieldName::DayHours),
        "night_hours" => Some(FieldName::NightHours),
        other => FieldName::from_str(other).ok(),
    }
}

/// Applies `fill_field` actions to the form draft.
///
/// Unknown action types, unknown fields, and values that fail validation are
/// skipped. Returns the fields that were set.
pub fn apply_actions(form: &mut ApplianceForm, actions: &[ConversationAction]) -> Vec<FieldName> {
    let mut applied = Vec::new();
    for action in actions {
        let ConversationAction::FillField { field, value } = action else {
            debug!("skipping non fill_field action");
            continue;
        };
        let Some(field_name) = parse_field(field) else {
            warn!(field = %field, "fill_field names an unknown field");
            continue;
        };
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => format_number(f),
                None => continue,
            },
            _ => {
                warn!(field = %field_name, "fill_field value is not a string or number");
                continue;
            }
        };
        match form.set(field_name, &value) {
            Ok(()) => applied.push(field_name),
            Err(e) => warn!(field = %field_name, error = %e, "fill_field value rejected"),
        }
    }
    applied
}
