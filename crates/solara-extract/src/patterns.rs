// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appliance keyword table.
//!
//! Order matters: the first matching pattern wins, so more specific phrases
//! ("deep freezer", "washing machine") come before generic ones ("fridge",
//! "machine"-like words never appear on their own).

use std::sync::LazyLock;

use regex::Regex;

/// Ordered `(pattern, canonical name)` pairs.
pub static APPLIANCE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\b(?:deep\s+)?freezers?\b", "freezer"),
        (r"\b(?:fridges?|refrigerators?|refridgerators?)\b", "refrigerator"),
        (r"\b(?:air[\s-]?condition(?:er|ers|ing)?|a\.?c\.?s?)\b", "air conditioner"),
        (r"\bwashing\s+machines?\b|\bwashers?\b", "washing machine"),
        (r"\bmicrowaves?(?:\s+ovens?)?\b", "microwave"),
        (r"\b(?:electric\s+)?kettles?\b", "electric kettle"),
        (r"\bblenders?\b", "blender"),
        (r"\b(?:pressing\s+)?irons?\b", "iron"),
        (r"\b(?:water\s+)?pumps?(?:ing\s+machines?)?\b", "water pump"),
        (r"\b(?:water\s+)?heaters?\b", "water heater"),
        (r"\b(?:ceiling\s+|standing\s+|table\s+)?fans?\b", "fan"),
        (r"\b(?:tvs?|t\.v\.?|televisions?|tellys?)\b", "television"),
        (r"\b(?:decoders?|dstv|gotv|set[\s-]?top\s+box(?:es)?)\b", "decoder"),
        (r"\b(?:sound\s+systems?|speakers?|home\s+theaters?|home\s+theatres?)\b", "sound system"),
        (r"\blaptops?\b", "laptop"),
        (r"\b(?:desktops?|computers?)\b", "desktop computer"),
        (r"\bprinters?\b", "printer"),
        (r"\b(?:routers?|wi-?fi|modems?)\b", "wifi router"),
        (r"\b(?:phone\s+chargers?|chargers?|phones?)\b", "phone charger"),
        (r"\b(?:cctv|security\s+cameras?|cameras?)\b", "cctv camera"),
        (r"\b(?:light\s*bulbs?|bulbs?|lights?|lamps?|lighting)\b", "light bulb"),
    ]
    .into_iter()
    .map(|(pattern, name)| {
        (
            Regex::new(&format!("(?i){pattern}")).expect("appliance pattern is valid"),
            name,
        )
    })
    .collect()
});

/// Canonical name of the first appliance pattern found in `text`.
pub fn match_appliance(text: &str) -> Option<&'static str> {
    APPLIANCE_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fridge_variants_map_to_refrigerator() {
        for text in ["my fridge", "two fridges", "a Refrigerator", "the refridgerator"] {
            assert_eq!(match_appliance(text), Some("refrigerator"), "{text}");
        }
    }

    #[test]
    fn specific_phrases_win_over_generic_ones() {
        assert_eq!(match_appliance("a deep freezer"), Some("freezer"));
        assert_eq!(match_appliance("washing machine"), Some("washing machine"));
        assert_eq!(match_appliance("ceiling fan"), Some("fan"));
        assert_eq!(match_appliance("phone charger"), Some("phone charger"));
    }

    #[test]
    fn words_containing_keywords_do_not_match() {
        assert_eq!(match_appliance("I'm a fanatic"), None);
        assert_eq!(match_appliance("ironic"), None);
        assert_eq!(match_appliance("actually"), None);
    }

    #[test]
    fn unknown_appliance_has_no_match() {
        assert_eq!(match_appliance("a hovercraft"), None);
    }
}
