// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./nodevault.toml` > `~/.config/nodevault/nodevault.toml` >
//! `/etc/nodevault/nodevault.toml`, with `NODEVAULT_*` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::NodeVaultConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/nodevault/nodevault.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "nodevault.toml";

/// Per-user config file under the XDG config directory, if one is known.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nodevault").join(LOCAL_CONFIG_FILE))
}

/// Every file the default hierarchy reads, lowest priority first.
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    paths.extend(user_config_path());
    paths.push(PathBuf::from(LOCAL_CONFIG_FILE));
    paths
}

/// Build the Figment for the default hierarchy.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/nodevault/nodevault.toml`
/// 3. `~/.config/nodevault/nodevault.toml`
/// 4. `./nodevault.toml`
/// 5. `NODEVAULT_*` environment variables
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(NodeVaultConfig::default()));
    for path in config_file_candidates() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Load configuration from the default hierarchy.
pub fn load_config() -> Result<NodeVaultConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<NodeVaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NodeVaultConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, still honouring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<NodeVaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NodeVaultConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Config sections addressable from the environment.
const ENV_SECTIONS: [&str; 4] = ["vault", "storage", "logging", "export"];

/// `NODEVAULT_*` provider with explicit section mapping.
///
/// Uses `map()` rather than `split("_")` because keys contain underscores:
/// `NODEVAULT_VAULT_STORAGE_KEY` must become `vault.storage_key`.
fn env_provider() -> Env {
    Env::prefixed("NODEVAULT_")
        // Password variables are read by the prompt, not the config.
        .ignore(&["PASSWORD", "IMPORT_PASSWORD"])
        .map(|key| map_env_key(key.as_str()).into())
}

/// Split the leading section name off an env key. Only the first segment is
/// rewritten, so `vault_storage_key` stays `vault.storage_key`.
fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn env_var_maps_to_underscored_key() {
        // SAFETY: test-only env mutation, serialized with other env tests.
        unsafe { std::env::set_var("NODEVAULT_VAULT_STORAGE_KEY", "from-env") };
        let result = Figment::new()
            .merge(Serialized::defaults(NodeVaultConfig::default()))
            .merge(env_provider())
            .extract::<NodeVaultConfig>();
        unsafe { std::env::remove_var("NODEVAULT_VAULT_STORAGE_KEY") };

        assert_eq!(result.unwrap().vault.storage_key, "from-env");
    }

    #[test]
    #[serial_test::serial]
    fn password_env_var_is_not_a_config_key() {
        unsafe { std::env::set_var("NODEVAULT_PASSWORD", "hunter2") };
        let result = Figment::new()
            .merge(Serialized::defaults(NodeVaultConfig::default()))
            .merge(env_provider())
            .extract::<NodeVaultConfig>();
        unsafe { std::env::remove_var("NODEVAULT_PASSWORD") };

        assert!(result.is_ok(), "deny_unknown_fields must not see the password");
    }

    #[test]
    #[serial_test::serial]
    fn env_overrides_reach_every_section() {
        unsafe {
            std::env::set_var("NODEVAULT_LOGGING_LEVEL", "debug");
            std::env::set_var("NODEVAULT_STORAGE_DATABASE_PATH", "/tmp/env.db");
            std::env::set_var("NODEVAULT_EXPORT_DEFAULT_FILE", "env.nv.enc");
            std::env::set_var("NODEVAULT_VAULT_AUTO_LOCK_CHECK_SECS", "15");
        }
        let result = Figment::new()
            .merge(Serialized::defaults(NodeVaultConfig::default()))
            .merge(env_provider())
            .extract::<NodeVaultConfig>();
        unsafe {
            std::env::remove_var("NODEVAULT_LOGGING_LEVEL");
            std::env::remove_var("NODEVAULT_STORAGE_DATABASE_PATH");
            std::env::remove_var("NODEVAULT_EXPORT_DEFAULT_FILE");
            std::env::remove_var("NODEVAULT_VAULT_AUTO_LOCK_CHECK_SECS");
        }

        let config = result.unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.storage.database_path, "/tmp/env.db");
        assert_eq!(config.export.default_file, "env.nv.enc");
        assert_eq!(config.vault.auto_lock_check_secs, 15);
    }

    #[test]
    fn env_key_mapping_splits_first_segment_only() {
        assert_eq!(map_env_key("VAULT_STORAGE_KEY"), "vault.storage_key");
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(map_env_key("LOGGING_LEVEL"), "logging.level");
        assert_eq!(map_env_key("VAULTX"), "vaultx");
    }

    #[test]
    fn candidates_end_with_local_file() {
        let paths = config_file_candidates();
        assert_eq!(paths.first().unwrap(), Path::new(SYSTEM_CONFIG_PATH));
        assert_eq!(paths.last().unwrap(), Path::new(LOCAL_CONFIG_FILE));
    }
}
