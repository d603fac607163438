// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::NodeVaultConfig;

/// Log levels accepted in `logging.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Longest allowed gap between auto-lock checks. Inactivity must be noticed
/// at least once a minute.
pub const MAX_AUTO_LOCK_CHECK_SECS: u64 = 60;

/// Validate semantic constraints serde cannot express.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &NodeVaultConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.vault.storage_key.trim().is_empty() {
        fail("vault.storage_key must not be empty".to_string());
    }

    let secs = config.vault.auto_lock_check_secs;
    if !(1..=MAX_AUTO_LOCK_CHECK_SECS).contains(&secs) {
        fail(format!(
            "vault.auto_lock_check_secs must be 1..={MAX_AUTO_LOCK_CHECK_SECS}, got {secs}"
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "logging.level `{}` is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.export.default_file.trim().is_empty() {
        fail("export.default_file must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
