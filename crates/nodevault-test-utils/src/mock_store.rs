// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value store wrapper with failure injection.
//!
//! `MockStore` forwards to an inner store (in-memory by default) and can be
//! told to fail reads or writes, so tests can drive the controller's error
//! paths without a broken disk.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use nodevault_core::{KeyValueStore, NodeVaultError};
use nodevault_storage::memory::MemoryStore;

pub struct MockStore {
    inner: Arc<dyn KeyValueStore>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MockStore {
    /// A mock over a fresh in-memory store.
    pub fn new() -> Self {
        Self::wrapping(Arc::new(MemoryStore::new()))
    }

    /// A mock forwarding to `inner`.
    pub fn wrapping(inner: Arc<dyn KeyValueStore>) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent `get` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `set` fail without touching the inner store.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Read straight from the inner store, bypassing failure injection.
    pub async fn raw_get(&self, key: &str) -> Option<String> {
        self.inner.get(key).await.ok().flatten()
    }

    /// Write straight to the inner store, bypassing failure injection.
    pub async fn raw_set(&self, key: &str, value: &str) -> Result<(), NodeVaultError> {
        self.inner.set(key, value).await
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MockStore {
    async fn get(&self, key: &str) -> Result<Option<String>, NodeVaultError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(NodeVaultError::storage(std::io::Error::other("injected read failure")));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), NodeVaultError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(NodeVaultError::storage(std::io::Error::other("injected write failure")));
        }
        self.inner.set(key, value).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
