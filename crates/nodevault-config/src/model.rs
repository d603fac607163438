// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for NodeVault.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a mistyped key is
//! reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level NodeVault configuration.
///
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NodeVaultConfig {
    /// Vault session settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Where the sealed vault is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Encrypted backup export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Vault session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Storage key the sealed envelope is written under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Seconds between auto-lock checks while unlocked (1..=60).
    #[serde(default = "default_auto_lock_check_secs")]
    pub auto_lock_check_secs: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            auto_lock_check_secs: default_auto_lock_check_secs(),
        }
    }
}

fn default_storage_key() -> String {
    "vault-data".to_string()
}

fn default_auto_lock_check_secs() -> u64 {
    60
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database holding the sealed vault.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("nodevault").join("nodevault.db").display().to_string())
        .unwrap_or_else(|| "nodevault.db".to_string())
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Backup export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// File name used when `export` is run without `--output`.
    #[serde(default = "default_export_file")]
    pub default_file: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_file: default_export_file(),
        }
    }
}

fn default_export_file() -> String {
    "vault-backup.nv.enc".to_string()
}
