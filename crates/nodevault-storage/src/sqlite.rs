// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed [`KeyValueStore`].

use std::path::Path;

use async_trait::async_trait;
use nodevault_core::{KeyValueStore, NodeVaultError};
use rusqlite::{OptionalExtension, params};
use tracing::debug;

use crate::migrations;

/// Key-value store persisted in a SQLite database file.
///
/// Holds the only connection to the file; `tokio-rusqlite` runs every call
/// on one background thread.
pub struct SqliteStore {
    conn: tokio_rusqlite::Connection,
    path: String,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").field("path", &self.path).finish()
    }
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and apply migrations.
    pub async fn open(path: &str) -> Result<Self, NodeVaultError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(NodeVaultError::storage)?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(NodeVaultError::storage)?;
        conn.call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(map_tr_err)?;

        debug!(path = %path, "vault store opened");
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    /// Filesystem path of the database.
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, NodeVaultError> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
                conn.query_row(
                    "SELECT value FROM vault_kv WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), NodeVaultError> {
        let key_owned = key.to_string();
        let value = value.to_string();
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT OR REPLACE INTO vault_kv (key, value, updated_at)
                     VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
                    params![key_owned, value],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(key = %key, "vault store entry written");
        Ok(())
    }
}

/// Convert tokio-rusqlite errors to [`NodeVaultError::Storage`].
fn map_tr_err<E: std::fmt::Display>(e: tokio_rusqlite::Error<E>) -> NodeVaultError {
    NodeVaultError::storage(format!("vault database error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_key_returns_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vault.db");
        let store = SqliteStore::open(path.to_str().unwrap()).await.unwrap();
        assert!(store.get("vault-data").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vault.db");
        let store = SqliteStore::open(path.to_str().unwrap()).await.unwrap();

        store.set("vault-data", r#"{"data":"ab"}"#).await.unwrap();
        assert_eq!(
            store.get("vault-data").await.unwrap().as_deref(),
            Some(r#"{"data":"ab"}"#)
        );
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vault.db");
        let store = SqliteStore::open(path.to_str().unwrap()).await.unwrap();

        store.set("k", "one").await.unwrap();
        store.set("k", "two").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn open_on_directory_path_is_storage_error() {
        let dir = tempdir().unwrap();
        let err = SqliteStore::open(dir.path().to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, NodeVaultError::Storage { .. }));
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("vault.db");
        let path = path.to_str().unwrap();

        {
            let store = SqliteStore::open(path).await.unwrap();
            store.set("vault-data", "sealed").await.unwrap();
        }

        let reopened = SqliteStore::open(path).await.unwrap();
        assert_eq!(
            reopened.get("vault-data").await.unwrap().as_deref(),
            Some("sealed")
        );
    }
}
