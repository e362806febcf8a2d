// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Solara crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use crate::error::SolaraError;

/// Unique identifier for an appliance record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplianceId(pub String);

impl ApplianceId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ApplianceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Default for ApplianceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ApplianceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    SpeechToText,
    TextToSpeech,
    Storage,
    Recommendation,
}

/// The appliance attributes the intake dialogue elicits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Name,
    Quantity,
    DayHours,
    NightHours,
    Wattage,
}

/// Fixed order in which the dialogue asks for fields.
pub const QUESTION_ORDER: [FieldName; 5] = [
    FieldName::Name,
    FieldName::Quantity,
    FieldName::DayHours,
    FieldName::NightHours,
    FieldName::Wattage,
];

impl FieldName {
    /// Position of this field in [`QUESTION_ORDER`].
    pub fn position(&self) -> usize {
        match self {
            FieldName::Name => 0,
            FieldName::Quantity => 1,
            FieldName::DayHours => 2,
            FieldName::NightHours => 3,
            FieldName::Wattage => 4,
        }
    }

    /// The field asked after this one, or `None` for the last field.
    pub fn next(&self) -> Option<FieldName> {
        QUESTION_ORDER.get(self.position() + 1).copied()
    }

    /// Whether answers to this field are numbers.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldName::Name)
    }

    /// Human-readable label used in prompts and listings.
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::Name => "appliance name",
            FieldName::Quantity => "quantity",
            FieldName::DayHours => "daytime hours",
            FieldName::NightHours => "night-time hours",
            FieldName::Wattage => "wattage",
        }
    }
}

/// One field bound from an utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub field: FieldName,
    pub value: String,
}

impl Extraction {
    pub fn new(field: FieldName, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Formats a number the way it is spoken back and stored as a field value:
/// integral values lose their fractional part (`500.0` -> `"500"`).
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{value:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// One user-described electrical appliance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceRecord {
    pub id: ApplianceId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub day_hours: f64,
    #[serde(default)]
    pub night_hours: f64,
    #[serde(default)]
    pub wattage: Option<f64>,
}

fn default_quantity() -> u32 {
    1
}

impl Default for ApplianceRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplianceRecord {
    /// Creates an empty record with a fresh id and default quantity/hours.
    pub fn new() -> Self {
        Self {
            id: ApplianceId::new(),
            name: None,
            quantity: default_quantity(),
            day_hours: 0.0,
            night_hours: 0.0,
            wattage: None,
        }
    }

    /// Parses and stores a raw field value.
    ///
    /// Numeric fields must parse to a non-negative number; quantity must be a
    /// positive whole number, hours must be within a day, and wattage must be
    /// positive. The record is unchanged on error.
    pub fn set_field(&mut self, field: FieldName, value: &str) -> Result<(), SolaraError> {
        let value = value.trim();
        match field {
            FieldName::Name => {
                if value.is_empty() {
                    return Err(SolaraError::Validation(
                        "appliance name must not be empty".into(),
                    ));
                }
                self.name = Some(value.to_string());
            }
            FieldName::Quantity => {
                let n = parse_non_negative(field, value)?;
                if n < 1.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
                    return Err(SolaraError::Validation(format!(
                        "quantity must be a positive whole number, got `{value}`"
                    )));
                }
                self.quantity = n as u32;
            }
            FieldName::DayHours | FieldName::NightHours => {
                let n = parse_non_negative(field, value)?;
                if n > 24.0 {
                    return Err(SolaraError::Validation(format!(
                        "{field} must be between 0 and 24, got `{value}`"
                    )));
                }
                if field == FieldName::DayHours {
                    self.day_hours = n;
                } else {
                    self.night_hours = n;
                }
            }
            FieldName::Wattage => {
                let n = parse_non_negative(field, value)?;
                if n <= 0.0 {
                    return Err(SolaraError::Validation(format!(
                        "wattage must be greater than zero, got `{value}`"
                    )));
                }
                self.wattage = Some(n);
            }
        }
        Ok(())
    }

    /// Current value of a field in its stored string form, `None` if unset.
    pub fn field_value(&self, field: FieldName) -> Option<String> {
        match field {
            FieldName::Name => self.name.clone(),
            FieldName::Quantity => Some(self.quantity.to_string()),
            FieldName::DayHours => Some(format_number(self.day_hours)),
            FieldName::NightHours => Some(format_number(self.night_hours)),
            FieldName::Wattage => self.wattage.map(format_number),
        }
    }

    /// Whether the record carries everything finalization requires.
    pub fn is_complete(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty()) && self.wattage.is_some()
    }

    /// Total hours of use per day.
    pub fn total_hours(&self) -> f64 {
        self.day_hours + self.night_hours
    }
}

fn parse_non_negative(field: FieldName, value: &str) -> Result<f64, SolaraError> {
    let n: f64 = value.parse().map_err(|_| {
        SolaraError::Validation(format!("{field} must be a number, got `{value}`"))
    })?;
    if !n.is_finite() || n < 0.0 {
        return Err(SolaraError::Validation(format!(
            "{field} must be a non-negative number, got `{value}`"
        )));
    }
    Ok(n)
}

/// Which speech tier produced a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum SpeechTier {
    Cloud,
    Device,
}

/// A recognized utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub confidence: f32,
    pub tier: SpeechTier,
}

/// Preferred synthetic voice gender.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    Female,
    Male,
    Neutral,
}

/// Voice preference passed to `speak`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfile {
    /// BCP-47 locale such as `en-NG`.
    pub language: String,
    pub gender: VoiceGender,
    pub voice_type: String,
}

impl Default for VoiceProfile {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            gender: VoiceGender::Female,
            voice_type: "assistant".to_string(),
        }
    }
}

/// One selected component of the recommended system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemComponent {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "string_or_number")]
    pub warranty: Option<String>,
}

/// Price breakdown of a recommended system, in naira.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default, alias = "tax")]
    pub vat: f64,
    #[serde(default, alias = "total")]
    pub total_amount: f64,
}

/// Priced system bundle returned by the recommendation service.
///
/// Components are keyed by kind (`inverter`, `battery`, `solarPanel`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    #[serde(default)]
    pub components: BTreeMap<String, SystemComponent>,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub performance: serde_json::Value,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn field_names_use_wire_spelling() {
        assert_eq!(FieldName::DayHours.to_string(), "dayHours");
        assert_eq!(FieldName::from_str("nightHours").unwrap(), FieldName::NightHours);
        assert_eq!(
            serde_json::to_string(&FieldName::Wattage).unwrap(),
            "\"wattage\""
        );
    }

    #[test]
    fn question_order_advances_to_none() {
        assert_eq!(FieldName::Name.next(), Some(FieldName::Quantity));
        assert_eq!(FieldName::NightHours.next(), Some(FieldName::Wattage));
        assert_eq!(FieldName::Wattage.next(), None);
        for (i, f) in QUESTION_ORDER.iter().enumerate() {
            assert_eq!(f.position(), i);
        }
    }

    #[test]
    fn format_number_drops_integral_fraction() {
        assert_eq!(format_number(500.0), "500");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1.25), "1.25");
    }

    #[test]
    fn new_record_has_defaults() {
        let r = ApplianceRecord::new();
        assert_eq!(r.quantity, 1);
        assert_eq!(r.day_hours, 0.0);
        assert_eq!(r.night_hours, 0.0);
        assert!(r.name.is_none());
        assert!(r.wattage.is_none());
        assert!(!r.is_complete());
    }

    #[test]
    fn set_field_validates_per_type() {
        let mut r = ApplianceRecord::new();
        r.set_field(FieldName::Name, "freezer").unwrap();
        r.set_field(FieldName::Quantity, "2").unwrap();
        r.set_field(FieldName::DayHours, "8").unwrap();
        r.set_field(FieldName::NightHours, "3.5").unwrap();
        r.set_field(FieldName::Wattage, "800").unwrap();
        assert!(r.is_complete());
        assert_eq!(r.quantity, 2);
        assert_eq!(r.night_hours, 3.5);

        assert!(r.set_field(FieldName::Name, "  ").is_err());
        assert!(r.set_field(FieldName::Quantity, "0").is_err());
        assert!(r.set_field(FieldName::Quantity, "1.5").is_err());
        assert!(r.set_field(FieldName::DayHours, "-1").is_err());
        assert!(r.set_field(FieldName::DayHours, "25").is_err());
        assert!(r.set_field(FieldName::Wattage, "0").is_err());
        assert!(r.set_field(FieldName::Wattage, "lots").is_err());

        // Failed sets leave the record untouched.
        assert_eq!(r.name.as_deref(), Some("freezer"));
        assert_eq!(r.quantity, 2);
        assert_eq!(r.wattage, Some(800.0));
    }

    #[test]
    fn record_serializes_camel_case() {
        let mut r = ApplianceRecord::new();
        r.set_field(FieldName::DayHours, "4").unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["dayHours"], 4.0);
        assert!(json.get("day_hours").is_none());
    }

    #[test]
    fn recommendation_result_accepts_aliases_and_numeric_warranty() {
        let json = serde_json::json!({
            "components": {
                "inverter": {"name": "5kVA Hybrid", "quantity": 1, "warranty": 2},
                "battery": {"name": "200Ah Lithium", "quantity": 4, "warranty": "5 years"}
            },
            "pricing": {"subtotal": 1000.0, "tax": 75.0, "total": 1075.0}
        });
        let result: RecommendationResult = serde_json::from_value(json).unwrap();
        assert_eq!(result.pricing.vat, 75.0);
        assert_eq!(result.pricing.total_amount, 1075.0);
        assert_eq!(result.components["inverter"].warranty.as_deref(), Some("2"));
        assert_eq!(result.components["battery"].quantity, 4);
        assert!(result.performance.is_null());
    }
}
