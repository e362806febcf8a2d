// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Appliance attribute extraction.
//!
//! Turns a transcribed utterance into typed appliance fields using ordered
//! regex rules: a first-match-wins appliance name table, watt and hour unit
//! patterns, and quantity heuristics. Ambiguous input binds nothing.

pub mod extractor;
pub mod numbers;
pub mod patterns;

pub use extractor::{AttributeExtractor, Extractions, bound_fields, split_hours};
