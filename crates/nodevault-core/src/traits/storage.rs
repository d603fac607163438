// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value storage trait for persisting the sealed vault.

use async_trait::async_trait;

use crate::error::NodeVaultError;

/// Opaque string key-value store holding sealed envelopes.
///
/// The vault only relies on one guarantee: once `set` returns `Ok`, a later
/// `get` on the same key returns the written value until it is overwritten.
/// A failed `set` must leave the previous value in place.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing was written yet.
    async fn get(&self, key: &str) -> Result<Option<String>, NodeVaultError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), NodeVaultError>;
}
