// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Price formatting and the printable order summary.

use std::fmt;

use solara_core::RecommendationResult;

/// Formats an amount in naira with thousands separators.
///
/// Whole amounts print without decimals (`₦1,075,000`); fractional amounts
/// keep two (`₦1,500.50`).
pub fn format_naira(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative && cents > 0 { "-" } else { "" };
    if fraction == 0 {
        format!("{sign}₦{grouped}")
    } else {
        format!("{sign}₦{grouped}.{fraction:02}")
    }
}

/// Printable breakdown of a recommendation.
pub struct OrderSummary<'a> {
    result: &'a RecommendationResult,
    address: Option<&'a str>,
}

impl<'a> OrderSummary<'a> {
    pub fn new(result: &'a RecommendationResult) -> Self {
        Self {
            result,
            address: None,
        }
    }

    pub fn with_address(mut self, address: Option<&'a str>) -> Self {
        self.address = address;
        self
    }

    /// The formatted order total.
    pub fn total(&self) -> String {
        format_naira(self.result.pricing.total_amount)
    }
}

impl fmt::Display for OrderSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.result.components.is_empty() {
            writeln!(f, "(no components)")?;
        }
        for (kind, component) in &self.result.components {
            write!(f, "{kind:<14} {} x{}", component.name, component.quantity)?;
            if let Some(warranty) = &component.warranty {
                write!(f, " (warranty: {warranty})")?;
            }
            writeln!(f)?;
        }
        let pricing = &self.result.pricing;
        writeln!(f, "{:<14} {}", "Subtotal", format_naira(pricing.subtotal))?;
        writeln!(f, "{:<14} {}", "VAT", format_naira(pricing.vat))?;
        write!(f, "{:<14} {}", "Total", self.total())?;
        if let Some(address) = self.address {
            write!(f, "\n{:<14} {address}", "Deliver to")?;
        }
        Ok(())
    }
}
