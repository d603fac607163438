// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value stores backing the sealed NodeVault envelope.
//!
//! - [`SqliteStore`]: on-disk store; every write goes through
//!   `tokio-rusqlite`'s single background thread, so writes are serialized
//!   and each `set` is one atomic statement.
//! - [`MemoryStore`]: process-local map, for ephemeral sessions and tests.

pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
