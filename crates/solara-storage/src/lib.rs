// SPDX-FileCopyrightText: 2026 Solara Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key-value storage for the Solara voice intake engine.
//!
//! Provides a WAL-mode SQLite store with a single-writer concurrency model via
//! `tokio-rusqlite`, an in-memory store for tests and ephemeral runs, and
//! helpers for reading JSON values defensively.

pub mod database;
pub mod json;
pub mod keys;
pub mod memory;
pub mod sqlite;

pub use database::Database;
pub use json::{load_json, save_json};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
