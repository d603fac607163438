// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`KeyValueStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use nodevault_core::{KeyValueStore, NodeVaultError};
use tokio::sync::RwLock;

/// Process-local store. Contents vanish when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.to_string());
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, NodeVaultError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), NodeVaultError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_entry_is_readable() {
        let store = MemoryStore::with_entry("a", "1");
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        assert!(store.get("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_replaces_value() {
        let store = MemoryStore::new();
        store.set("a", "1").await.unwrap();
        store.set("a", "2").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("2"));
    }
}
