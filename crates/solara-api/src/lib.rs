// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend clients for the Solara voice intake engine.
//!
//! * [`RecommendationClient`] submits the appliance list for pricing and
//!   remembers the last result.
//! * [`ConversationClient`] runs one free-form conversational turn and
//!   returns form-filling actions.
//! * [`format_naira`] and [`OrderSummary`] render prices for display.

pub mod conversation;
pub mod format;
pub mod recommendation;
pub mod wire;

pub use conversation::{apply_actions, ConversationClient};
pub use format::{format_naira, OrderSummary};
pub use recommendation::RecommendationClient;
pub use wire::{ConversationAction, ConversationRequest, ConversationResponse};
