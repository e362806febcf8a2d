// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Well-known storage keys.

/// Finalized appliance list (JSON array of appliance records).
pub const APPLIANCES: &str = "solara.appliances";

/// Most recent recommendation result (JSON object).
pub const LAST_RECOMMENDATION: &str = "solara.last_recommendation";

/// Last delivery address entered at checkout.
pub const LAST_ADDRESS: &str = "solara.last_address";

/// User preferences (voice, language).
pub const PREFERENCES: &str = "solara.preferences";
