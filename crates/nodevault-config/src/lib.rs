// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for NodeVault.
//!
//! TOML files from the XDG hierarchy plus `NODEVAULT_*` environment
//! overrides, strict key checking, and miette diagnostics with typo
//! suggestions.
//!
//! ```no_run
//! use nodevault_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("vault stored at {}", config.storage.database_path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::NodeVaultConfig;

/// Load configuration from the default hierarchy and validate it.
pub fn load_and_validate() -> Result<NodeVaultConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from one explicit file and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<NodeVaultConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_sources(std::iter::once(path.to_path_buf()))
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<NodeVaultConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

#[allow(clippy::result_large_err)]
fn finish(
    loaded: Result<NodeVaultConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<NodeVaultConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

/// Read every config file of the default hierarchy that exists, for error spans.
fn collect_toml_sources() -> Vec<(String, String)> {
    read_sources(loader::config_file_candidates().into_iter())
}

fn read_sources(paths: impl Iterator<Item = std::path::PathBuf>) -> Vec<(String, String)> {
    paths
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            let shown = std::path::absolute(&path).unwrap_or(path);
            Some((shown.display().to_string(), content))
        })
        .collect()
}
