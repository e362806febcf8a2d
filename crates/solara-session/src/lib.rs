// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session state for the Solara voice intake engine.
//!
//! * [`ApplianceForm`] owns the in-progress appliance draft and the list of
//!   finalized appliances, and persists the list to local storage.
//! * [`AppState`] holds cross-view state and is changed only through
//!   [`reduce`] with a typed [`Action`].

pub mod form;
pub mod persistence;
pub mod state;

pub use form::{validate_manual, ApplianceForm, MAX_RECORDS};
pub use persistence::{KvStatePersistence, StatePersistence};
pub use state::{reduce, Action, AppState, Preferences, View};
