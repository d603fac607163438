// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for vault lifecycle tests.
//!
//! `TestHarness` wires a [`VaultController`] to a [`MockStore`], optionally
//! backed by a temp SQLite database, and can "restart" the process by
//! building a fresh controller over the same store.

use std::sync::Arc;
use std::time::Duration;

use nodevault_core::{KeyValueStore, NodeVaultError};
use nodevault_storage::sqlite::SqliteStore;
use nodevault_vault::{ControllerSettings, VaultController};
use secrecy::SecretString;

use crate::mock_store::MockStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    settings: ControllerSettings,
    sqlite: bool,
    stored_envelope: Option<String>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            settings: ControllerSettings::default(),
            sqlite: false,
            stored_envelope: None,
        }
    }

    /// Set the auto-lock check period.
    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.settings.check_interval = interval;
        self
    }

    /// Set the storage key the controller writes under.
    pub fn with_storage_key(mut self, key: &str) -> Self {
        self.settings.storage_key = key.to_string();
        self
    }

    /// Back the mock store with a SQLite database in a temp directory.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    /// Pre-populate the storage key with raw envelope text.
    pub fn with_stored_envelope(mut self, text: impl Into<String>) -> Self {
        self.stored_envelope = Some(text.into());
        self
    }

    pub async fn build(self) -> Result<TestHarness, NodeVaultError> {
        let (store, temp_dir) = if self.sqlite {
            let temp_dir = tempfile::TempDir::new().map_err(NodeVaultError::storage)?;
            let path = temp_dir.path().join("vault.db");
            let sqlite = SqliteStore::open(&path.to_string_lossy()).await?;
            let inner: Arc<dyn KeyValueStore> = Arc::new(sqlite);
            (Arc::new(MockStore::wrapping(inner)), Some(temp_dir))
        } else {
            (Arc::new(MockStore::new()), None)
        };

        if let Some(text) = &self.stored_envelope {
            store.raw_set(&self.settings.storage_key, text).await?;
        }

        let vault = VaultController::new(store.clone(), self.settings.clone());
        Ok(TestHarness {
            vault,
            store,
            settings: self.settings,
            _temp_dir: temp_dir,
        })
    }
}

/// A controller plus the store it persists to.
pub struct TestHarness {
    pub vault: VaultController,
    pub store: Arc<MockStore>,
    settings: ControllerSettings,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default settings over an in-memory store.
    pub async fn new() -> Result<Self, NodeVaultError> {
        Self::builder().build().await
    }

    /// A new controller over the same store, as after a process restart.
    pub fn restart(&self) -> VaultController {
        VaultController::new(self.store.clone(), self.settings.clone())
    }

    /// The envelope text currently stored under the storage key.
    pub async fn stored_envelope(&self) -> Option<String> {
        self.store.raw_get(&self.settings.storage_key).await
    }
}

/// Shorthand for building a test password.
pub fn password(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}
