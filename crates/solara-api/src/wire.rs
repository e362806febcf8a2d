// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response bodies exchanged with the backends.

use serde::{Deserialize, Serialize};
use solara_core::{ApplianceRecord, RecommendationResult};

/// One appliance as the recommendation endpoint expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    pub name_of_item: String,
    pub quantity: u32,
    pub day_hours: f64,
    pub night_hours: f64,
    pub wattage: f64,
}

impl From<&ApplianceRecord> for RecommendationItem {
    fn from(record: &ApplianceRecord) -> Self {
        Self {
            name_of_item: record.name.clone().unwrap_or_default(),
            quantity: record.quantity,
            day_hours: record.day_hours,
            night_hours: record.night_hours,
            wattage: record.wattage.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationRequest {
    pub items: Vec<RecommendationItem>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationResponse {
    pub recommendation: RecommendationResult,
}

/// Error body returned by either backend on a non-success status.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// The server-provided message, if the body carried one.
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

/// One prior exchange in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
}

/// Body of a conversational turn request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRequest {
    pub user_message: String,
    /// Free-form context for the assistant: current draft, current view.
    pub context: serde_json::Value,
    pub session_id: String,
    pub conversation_history: Vec<ConversationTurn>,
}

/// An instruction returned alongside the assistant's reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationAction {
    FillField {
        field: String,
        value: serde_json::Value,
    },
    #[serde(other)]
    Unknown,
}

/// Body of a conversational turn response.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub actions: Vec<ConversationAction>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}
