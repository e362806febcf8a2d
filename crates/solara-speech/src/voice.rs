// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice selection for on-device synthesis.

use serde::{Deserialize, Serialize};
use solara_core::{VoiceGender, VoiceProfile};

/// An installed synthesis voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub name: String,
    /// BCP-47 locale such as `en-NG`.
    pub language: String,
    #[serde(default)]
    pub gender: Option<VoiceGender>,
}

impl VoiceInfo {
    pub fn new(name: impl Into<String>, language: impl Into<String>, gender: Option<VoiceGender>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            gender,
        }
    }
}

fn family(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

/// Picks the best available voice for `preference`.
///
/// Preference order: exact locale and gender, exact locale, same language
/// family (`en-GB` for `en-NG`), then any voice at all.
pub fn select_voice<'a>(voices: &'a [VoiceInfo], preference: &VoiceProfile) -> Option<&'a VoiceInfo> {
    let wanted = preference.language.as_str();
    let same_locale = |v: &&VoiceInfo| v.language.eq_ignore_ascii_case(wanted);

    voices
        .iter()
        .filter(same_locale)
        .find(|v| v.gender == Some(preference.gender))
        .or_else(|| voices.iter().find(same_locale))
        .or_else(|| {
            voices
                .iter()
                .find(|v| family(&v.language).eq_ignore_ascii_case(family(wanted)))
        })
        .or_else(|| voices.first())
}

/// Voices the console synthesizer announces itself with.
pub fn builtin_voices() -> Vec<VoiceInfo> {
    vec![
        VoiceInfo::new("Ada", "en-NG", Some(VoiceGender::Female)),
        VoiceInfo::new("Tunde", "en-NG", Some(VoiceGender::Male)),
        VoiceInfo::new("Amelia", "en-GB", Some(VoiceGender::Female)),
        VoiceInfo::new("Samantha", "en-US", Some(VoiceGender::Female)),
        VoiceInfo::new("Alex", "en-US", Some(VoiceGender::Male)),
        VoiceInfo::new("Amélie", "fr-FR", Some(VoiceGender::Female)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(language: &str, gender: VoiceGender) -> VoiceProfile {
        VoiceProfile {
            language: language.into(),
            gender,
            voice_type: "assistant".into(),
        }
    }

    #[test]
    fn exact_locale_and_gender_first() {
        let voices = builtin_voices();
        let v = select_voice(&voices, &profile("en-NG", VoiceGender::Male)).unwrap();
        assert_eq!(v.name, "Tunde");
    }

    #[test]
    fn exact_locale_when_gender_missing() {
        let voices = builtin_voices();
        let v = select_voice(&voices, &profile("en-gb", VoiceGender::Male)).unwrap();
        assert_eq!(v.name, "Amelia");
    }

    #[test]
    fn language_family_fallback() {
        let voices = builtin_voices();
        let v = select_voice(&voices, &profile("fr-CA", VoiceGender::Male)).unwrap();
        assert_eq!(v.name, "Amélie");
    }

    #[test]
    fn any_voice_as_last_resort() {
        let voices = builtin_voices();
        let v = select_voice(&voices, &profile("yo-NG", VoiceGender::Female)).unwrap();
        assert_eq!(v.name, "Ada");
        assert!(select_voice(&[], &profile("en-NG", VoiceGender::Female)).is_none());
    }
}
