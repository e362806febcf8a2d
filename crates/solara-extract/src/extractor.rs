// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered-rule attribute extraction.
//!
//! Rules run in a fixed order and each number in the utterance can be
//! claimed by at most one rule:
//!
//! 1. appliance name (first matching keyword pattern)
//! 2. wattage (number next to a watt unit)
//! 3. hours (numbers next to an hour unit, split between day and night)
//! 4. quantity (number followed by `of`/`pieces`/`units`)
//! 5. bare numbers: answer the asked numeric field, otherwise a bare number
//!    up to 10 is a quantity

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use solara_core::types::format_number;
use solara_core::{Extraction, FieldName, QUESTION_ORDER};
use tracing::trace;

use crate::numbers::normalize_number_words;
use crate::patterns::match_appliance;

static WATT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(kw|kilowatts?|w|watts?)\b").expect("watt pattern is valid")
});

static HOUR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(?:hours?|hrs?)\b").expect("hour pattern is valid")
});

/// The count must be a whole token: digits after a decimal point are not a
/// quantity.
static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d.,])(\d+)\s*(?:of\b|pieces?\b|pcs\b|units?\b)")
        .expect("quantity pattern is valid")
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("number pattern is valid"));

static ROUND_THE_CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b24\s*/\s*7\b|\ball\s+day\s+and\s+(?:all\s+)?night\b")
        .expect("round-the-clock pattern is valid")
});

/// Largest bare number treated as a quantity when nothing else claims it.
const MAX_BARE_QUANTITY: f64 = 10.0;

/// Fields bound from one utterance, kept in question order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extractions(Vec<Extraction>);

impl Extractions {
    fn bind(&mut self, field: FieldName, value: impl Into<String>) {
        self.0.retain(|e| e.field != field);
        self.0.push(Extraction::new(field, value));
        self.0.sort_by_key(|e| e.field.position());
    }

    fn unbind(&mut self, field: FieldName) {
        self.0.retain(|e| e.field != field);
    }

    /// Value bound to `field`, if any.
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.value.as_str())
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Extraction> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<Extraction> {
        self.0
    }
}

impl From<Vec<Extraction>> for Extractions {
    fn from(items: Vec<Extraction>) -> Self {
        let mut out = Extractions::default();
        for e in items {
            out.bind(e.field, e.value);
        }
        out
    }
}

/// Splits a single hours-of-use total between day and night.
///
/// `24` splits evenly, totals above 12 split ceil/floor, and totals up to 12
/// are all daytime. Totals outside `0..=24` do not split.
pub fn split_hours(total: f64) -> Option<(f64, f64)> {
    if !total.is_finite() || !(0.0..=24.0).contains(&total) {
        return None;
    }
    if total == 24.0 {
        Some((12.0, 12.0))
    } else if total > 12.0 {
        Some(((total / 2.0).ceil(), (total / 2.0).floor()))
    } else {
        Some((total, 0.0))
    }
}

/// Pure, stateless utterance parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeExtractor;

impl AttributeExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts the single most relevant field from `utterance`.
    ///
    /// When `target` is given and bound, that binding is returned; otherwise
    /// the first bound field in question order. `None` means nothing could
    /// be bound with confidence.
    pub fn extract(&self, utterance: &str, target: Option<FieldName>) -> Option<Extraction> {
        let bound = self.resolve(utterance, target);
        if let Some(field) = target
            && let Some(value) = bound.get(field)
        {
            return Some(Extraction::new(field, value));
        }
        bound.into_vec().into_iter().next()
    }

    /// Every field the utterance binds, without any question context.
    pub fn extract_all(&self, utterance: &str) -> Extractions {
        self.bind(utterance, None)
    }

    /// Every field the utterance binds when `target` is the field being asked.
    ///
    /// The target resolves ambiguity: a bare number answers it, and a single
    /// small hour figure answers only the asked hours field instead of being
    /// split across day and night.
    pub fn resolve(&self, utterance: &str, target: Option<FieldName>) -> Extractions {
        self.bind(utterance, target)
    }

    fn bind(&self, utterance: &str, target: Option<FieldName>) -> Extractions {
        let mut out = Extractions::default();
        let mut claimed: Vec<Range<usize>> = Vec::new();

        if let Some(name) = match_appliance(utterance) {
            out.bind(FieldName::Name, name);
        }

        let normalized = normalize_number_words(utterance);
        let text = ROUND_THE_CLOCK_RE.replace_all(&normalized, "24 hours");

        if let Some(caps) = WATT_RE.captures(&text)
            && let Some(number) = caps.get(1)
        {
            if let Ok(mut watts) = number.as_str().parse::<f64>() {
                if caps[2].starts_with('k') {
                    watts *= 1000.0;
                }
                out.bind(FieldName::Wattage, format_number(watts));
            }
            claimed.push(number.range());
        }

        let mut hours = Vec::new();
        for caps in HOUR_RE.captures_iter(&text) {
            let Some(number) = caps.get(1) else {
                continue;
            };
            if overlaps(&claimed, &number.range()) {
                continue;
            }
            claimed.push(number.range());
            if let Ok(h) = number.as_str().parse::<f64>() {
                hours.push(h);
            }
        }
        self.bind_hours(&mut out, &hours, target);

        if let Some(caps) = QUANTITY_RE.captures(&text)
            && let Some(number) = caps.get(1)
        {
            if !overlaps(&claimed, &number.range()) {
                if let Ok(q) = number.as_str().parse::<u32>()
                    && q >= 1
                {
                    out.bind(FieldName::Quantity, q.to_string());
                }
                claimed.push(number.range());
            }
        }

        let bare = NUMBER_RE
            .find_iter(&text)
            .find(|m| !overlaps(&claimed, &m.range()))
            .and_then(|m| m.as_str().parse::<f64>().ok());

        if let Some(n) = bare {
            match target {
                Some(field) if field.is_numeric() && !out.contains(field) => {
                    out.bind(field, format_number(n));
                }
                _ => {
                    if !out.contains(FieldName::Quantity)
                        && (1.0..=MAX_BARE_QUANTITY).contains(&n)
                        && n.fract() == 0.0
                    {
                        out.bind(FieldName::Quantity, format_number(n));
                    }
                }
            }
        }

        trace!(
            utterance,
            ?target,
            fields = ?out.iter().map(|e| e.field).collect::<Vec<_>>(),
            "extraction complete"
        );
        out
    }

    fn bind_hours(&self, out: &mut Extractions, hours: &[f64], target: Option<FieldName>) {
        match hours {
            [] => {}
            [total] => {
                let Some((day, night)) = split_hours(*total) else {
                    return;
                };
                let small = *total <= 12.0;
                match target {
                    Some(FieldName::NightHours) if small => {
                        out.bind(FieldName::NightHours, format_number(*total));
                    }
                    Some(FieldName::DayHours) if small => {
                        out.bind(FieldName::DayHours, format_number(*total));
                    }
                    _ => {
                        out.bind(FieldName::DayHours, format_number(day));
                        out.bind(FieldName::NightHours, format_number(night));
                    }
                }
            }
            [day, night, ..] => {
                if (0.0..=24.0).contains(day) && (0.0..=24.0).contains(night) {
                    out.bind(FieldName::DayHours, format_number(*day));
                    out.bind(FieldName::NightHours, format_number(*night));
                } else {
                    out.unbind(FieldName::DayHours);
                    out.unbind(FieldName::NightHours);
                }
            }
        }
    }
}

fn overlaps(claimed: &[Range<usize>], range: &Range<usize>) -> bool {
    claimed
        .iter()
        .any(|c| c.start < range.end && range.start < c.end)
}

/// All fields in question order that `extractions` binds.
pub fn bound_fields(extractions: &Extractions) -> Vec<FieldName> {
    QUESTION_ORDER
        .iter()
        .copied()
        .filter(|f| extractions.contains(*f))
        .collect()
}
