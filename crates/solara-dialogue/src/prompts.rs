// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Everything the assistant says.

use solara_core::FieldName;

pub const GREETING: &str =
    "Hi, I'm Solara. Let's size a solar system for you, one appliance at a time.";

pub const RECOVERY: &str = "Sorry, I had a little trouble speaking. Let me try that again.";

pub const NOT_CAUGHT: &str = "Sorry, I didn't catch that.";

pub const FINISHED: &str = "Thanks, I have everything I need for this appliance.";

/// The plain question for `field`.
pub fn question(field: FieldName) -> &'static str {
    match field {
        FieldName::Name => "What appliance would you like to add?",
        FieldName::Quantity => "How many of them do you have?",
        FieldName::DayHours => "How many hours does it run during the day?",
        FieldName::NightHours => "And how many hours does it run at night?",
        FieldName::Wattage => "What is its power rating in watts?",
    }
}

/// A more explicit version of the question that names the expected format.
pub fn directive(field: FieldName) -> &'static str {
    match field {
        FieldName::Name => {
            "Please just say the appliance name, for example freezer, fan, or television."
        }
        FieldName::Quantity => "Please say how many you have as a number, for example two.",
        FieldName::DayHours => {
            "Please say the number of daytime hours between 0 and 24, for example 8 hours."
        }
        FieldName::NightHours => {
            "Please say the number of night-time hours between 0 and 24, for example 3 hours."
        }
        FieldName::Wattage => "Please say the wattage as a number, for example 150 watts.",
    }
}

/// Acknowledges an accepted answer.
pub fn confirm(field: FieldName, value: &str) -> String {
    match field {
        FieldName::Name => format!("Great, a {value}."),
        FieldName::Quantity if value == "1" => "Just one.".to_string(),
        FieldName::Quantity => format!("{value} of them."),
        FieldName::DayHours => format!("{value} hours during the day."),
        FieldName::NightHours => format!("{value} hours at night."),
        FieldName::Wattage => format!("{value} watts."),
    }
}

/// Announces that a default was used for `field`.
pub fn announce_default(field: FieldName, value: &str) -> String {
    let what = match field {
        FieldName::Name => format!("I'll call it \"{value}\""),
        FieldName::Quantity => format!("I'll assume {value}"),
        FieldName::DayHours => format!("I'll assume {value} hours during the day"),
        FieldName::NightHours => format!("I'll assume {value} hours at night"),
        FieldName::Wattage => format!("I'll use {value} watts"),
    };
    format!("{what} for now. You can change it later.")
}
