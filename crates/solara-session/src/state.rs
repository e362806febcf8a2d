// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application state and its reducer.

use serde::{Deserialize, Serialize};
use solara_core::{RecommendationResult, VoiceGender, VoiceProfile};
use strum::Display;
use tracing::debug;

/// The screen the user is on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Home,
    VoiceAssistant,
    ManualEntry,
    Recommendation,
    Checkout,
    Receipt,
}

impl View {
    /// Human-readable heading for the view.
    pub fn title(self) -> &'static str {
        match self {
            View::Home => "Solara",
            View::VoiceAssistant => "Voice assistant",
            View::ManualEntry => "Add an appliance",
            View::Recommendation => "Your recommended system",
            View::Checkout => "Checkout",
            View::Receipt => "Order receipt",
        }
    }

    /// Views that only make sense once a recommendation exists.
    pub fn requires_recommendation(self) -> bool {
        match self {
            View::Recommendation | View::Checkout | View::Receipt => true,
            View::Home | View::VoiceAssistant | View::ManualEntry => false,
        }
    }
}

/// Voice preferences that override the configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub voice_gender: Option<VoiceGender>,
}

impl Preferences {
    /// `base` with any preferred language or gender applied.
    pub fn apply(&self, base: &VoiceProfile) -> VoiceProfile {
        let mut profile = base.clone();
        if let Some(language) = self.language.as_deref().filter(|l| !l.trim().is_empty()) {
            profile.language = language.to_string();
        }
        if let Some(gender) = self.voice_gender {
            profile.gender = gender;
        }
        profile
    }
}

/// Cross-view application state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub view: View,
    pub preferences: Preferences,
    pub last_address: Option<String>,
    pub last_recommendation: Option<RecommendationResult>,
}

/// Every change the application state can undergo.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate(View),
    SetPreferences(Preferences),
    SetAddress(String),
    RecommendationReceived(RecommendationResult),
    ClearRecommendation,
    Reset,
}

/// Applies `action` to `state`.
///
/// Navigating to a view that needs a recommendation while none exists lands
/// on [`View::Home`] instead.
pub fn reduce(state: AppState, action: Action) -> AppState {
    let next = match action {
        Action::Navigate(view) => {
            let view = if view.requires_recommendation() && state.last_recommendation.is_none() {
                View::Home
            } else {
                view
            };
            AppState { view, ..state }
        }
        Action::SetPreferences(preferences) => AppState {
            preferences,
            ..state
        },
        Action::SetAddress(address) => {
            let address = address.trim();
            AppState {
                last_address: (!address.is_empty()).then(|| address.to_string()),
                ..state
            }
        }
        Action::RecommendationReceived(result) => AppState {
            view: View::Recommendation,
            last_recommendation: Some(result),
            ..state
        },
        Action::ClearRecommendation => AppState {
            view: if state.view.requires_recommendation() {
                View::Home
            } else {
                state.view
            },
            last_recommendation: None,
            ..state
        },
        Action::Reset => AppState::default(),
    };
    debug!(view = %next.view, "state updated");
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_to_receipt_needs_a_recommendation() {
        let state = reduce(AppState::default(), Action::Navigate(View::Receipt));
        assert_eq!(state.view, View::Home);

        let state = reduce(
            state,
            Action::RecommendationReceived(RecommendationResult::default()),
        );
        assert_eq!(state.view, View::Recommendation);

        let state = reduce(state, Action::Navigate(View::Receipt));
        assert_eq!(state.view, View::Receipt);
    }

    #[test]
    fn clearing_recommendation_leaves_dependent_views() {
        let state = reduce(
            AppState::default(),
            Action::RecommendationReceived(RecommendationResult::default()),
        );
        let state = reduce(state, Action::Navigate(View::Checkout));
        let state = reduce(state, Action::ClearRecommendation);
        assert_eq!(state.view, View::Home);
        assert!(state.last_recommendation.is_none());
    }

    #[test]
    fn blank_address_clears_it() {
        let state = reduce(AppState::default(), Action::SetAddress(" 5 Bode Thomas ".into()));
        assert_eq!(state.last_address.as_deref(), Some("5 Bode Thomas"));
        let state = reduce(state, Action::SetAddress("   ".into()));
        assert_eq!(state.last_address, None);
    }

    #[test]
    fn preferences_override_profile() {
        let prefs = Preferences {
            language: Some("en-GB".into()),
            voice_gender: Some(VoiceGender::Male),
        };
        let profile = prefs.apply(&VoiceProfile::default());
        assert_eq!(profile.language, "en-GB");
        assert_eq!(profile.gender, VoiceGender::Male);
        assert_eq!(profile.voice_type, "assistant");

        let state = reduce(AppState::default(), Action::SetPreferences(prefs.clone()));
        assert_eq!(state.preferences, prefs);
        assert_eq!(reduce(state, Action::Reset), AppState::default());
    }

    #[test]
    fn every_view_has_a_title() {
        for view in [
            View::Home,
            View::VoiceAssistant,
            View::ManualEntry,
            View::Recommendation,
            View::Checkout,
            View::Receipt,
        ] {
            assert!(!view.title().is_empty());
        }
        assert_eq!(View::VoiceAssistant.to_string(), "voice-assistant");
    }
}
