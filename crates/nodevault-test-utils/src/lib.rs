// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for NodeVault integration tests.
//!
//! # Components
//!
//! - [`MockStore`] - Key-value store with injectable read/write failures
//! - [`TestHarness`] - Vault controller wired to a mock store, with restart

pub mod harness;
pub mod mock_store;

pub use harness::{TestHarness, TestHarnessBuilder, password};
pub use mock_store::MockStore;
