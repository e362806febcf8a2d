// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spelled-out number normalization.
//!
//! Speech engines frequently return "twenty four hours" or "five hundred
//! watts". Rewriting those to digits lets the numeric rules stay simple.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Digit groups written with thousands separators, e.g. `1,500` or `12,000`.
static GROUPED_DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,3}(?:,\d{3})+\b").expect("grouped digits pattern is valid")
});

fn unit_value(word: &str) -> Option<u64> {
    Some(match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    })
}

#[derive(Default)]
struct Accumulator {
    total: u64,
    current: u64,
    active: bool,
    overflowed: bool,
}

impl Accumulator {
    fn unit(&mut self, value: u64) {
        self.active = true;
        match self.current.checked_add(value) {
            Some(current) => self.current = current,
            None => self.overflowed = true,
        }
    }

    fn hundred(&mut self) {
        match self.current.max(1).checked_mul(100) {
            Some(current) => self.current = current,
            None => self.overflowed = true,
        }
    }

    fn thousand(&mut self) {
        let scaled = self.current.max(1).checked_mul(1000);
        match scaled.and_then(|n| self.total.checked_add(n)) {
            Some(total) => {
                self.total = total;
                self.current = 0;
            }
            None => self.overflowed = true,
        }
    }

    /// Emits the accumulated number, if any. A run that overflowed is
    /// dropped. Returns whether a number was written.
    fn flush(&mut self, out: &mut Vec<String>) -> bool {
        let mut written = false;
        if self.active {
            match self.total.checked_add(self.current) {
                Some(n) if !self.overflowed => {
                    out.push(n.to_string());
                    written = true;
                }
                _ => debug!("dropped spelled-out number too large to represent"),
            }
        }
        *self = Accumulator::default();
        written
    }
}

/// Removes thousands separators so `1,500` reads as `1500`.
pub fn strip_digit_grouping(text: &str) -> String {
    GROUPED_DIGITS_RE
        .replace_all(text, |caps: &regex::Captures<'_>| caps[0].replace(',', ""))
        .into_owned()
}

/// Lowercases `text` and replaces runs of number words with digits.
///
/// `"Twenty-four hours"` becomes `"24 hours"`, `"five hundred watts"` becomes
/// `"500 watts"`, and `"1,500 watts"` becomes `"1500 watts"`. Everything
/// else passes through unchanged apart from case.
pub fn normalize_number_words(text: &str) -> String {
    let lower = strip_digit_grouping(&text.to_lowercase()).replace(|c: char| c == '-', " ");
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    let mut acc = Accumulator::default();

    for (i, token) in tokens.iter().enumerate() {
        let word = token.trim_end_matches(|c: char| matches!(c, ',' | '.' | '?' | '!'));
        let trailing = &token[word.len()..];

        let consumed = if let Some(v) = unit_value(word) {
            acc.unit(v);
            true
        } else if acc.active && word == "hundred" {
            acc.hundred();
            true
        } else if acc.active && word == "thousand" {
            acc.thousand();
            true
        } else {
            acc.active
                && word == "and"
                && trailing.is_empty()
                && tokens.get(i + 1).is_some_and(|next| unit_value(next).is_some())
        };

        if consumed {
            if !trailing.is_empty() {
                if acc.flush(&mut out)
                    && let Some(last) = out.last_mut()
                {
                    last.push_str(trailing);
                } else {
                    out.push(trailing.to_string());
                }
            }
            continue;
        }

        acc.flush(&mut out);
        out.push((*token).to_string());
    }
    acc.flush(&mut out);

    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_words_become_digits() {
        assert_eq!(normalize_number_words("I have two fridges"), "i have 2 fridges");
        assert_eq!(normalize_number_words("zero"), "0");
    }

    #[test]
    fn compound_numbers_are_combined() {
        assert_eq!(normalize_number_words("Twenty-four hours"), "24 hours");
        assert_eq!(normalize_number_words("twenty four hours"), "24 hours");
        assert_eq!(normalize_number_words("five hundred watts"), "500 watts");
        assert_eq!(
            normalize_number_words("one thousand two hundred and fifty watts"),
            "1250 watts"
        );
    }

    #[test]
    fn trailing_punctuation_is_kept() {
        assert_eq!(normalize_number_words("about eight, maybe"), "about 8, maybe");
    }

    #[test]
    fn separate_numbers_stay_separate() {
        assert_eq!(
            normalize_number_words("eight hours day and three hours night"),
            "8 hours day and 3 hours night"
        );
    }

    #[test]
    fn thousands_separators_are_removed() {
        assert_eq!(normalize_number_words("It uses 1,500 watts"), "it uses 1500 watts");
        assert_eq!(normalize_number_words("1,200"), "1200");
        assert_eq!(normalize_number_words("2,500,000 naira"), "2500000 naira");
        assert_eq!(normalize_number_words("8, 10 hours"), "8, 10 hours");
    }

    #[test]
    fn repeated_hundreds_do_not_overflow() {
        let text = format!("one{} watts", " hundred".repeat(12));
        assert_eq!(normalize_number_words(&text), "watts");

        let text = format!("five{} thousand watts", " hundred".repeat(12));
        assert_eq!(normalize_number_words(&text), "watts");
    }

    #[test]
    fn text_without_numbers_is_only_lowercased() {
        assert_eq!(normalize_number_words("A Deep Freezer"), "a deep freezer");
    }
}
