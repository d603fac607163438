// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nodevault status` command implementation.
//!
//! Reports where the vault lives and whether one has been saved yet. Never
//! asks for a password.

use std::io::IsTerminal;

use nodevault_config::NodeVaultConfig;
use nodevault_core::NodeVaultError;
use nodevault_vault::VaultController;
use serde::Serialize;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub vault_exists: bool,
    pub database_path: String,
    pub storage_key: String,
    pub auto_lock_check_secs: u64,
}

impl StatusResponse {
    pub async fn collect(
        config: &NodeVaultConfig,
        vault: &VaultController,
    ) -> Result<Self, NodeVaultError> {
        Ok(Self {
            vault_exists: vault.has_stored_vault().await?,
            database_path: config.storage.database_path.clone(),
            storage_key: config.vault.storage_key.clone(),
            auto_lock_check_secs: config.vault.auto_lock_check_secs,
        })
    }
}

/// Run the `nodevault status` command.
///
/// `--json` prints structured output for scripting. `--plain`, or a stdout
/// that is not a TTY, disables colors.
pub async fn run_status(
    config: &NodeVaultConfig,
    vault: &VaultController,
    json: bool,
    plain: bool,
) -> Result<(), NodeVaultError> {
    let status = StatusResponse::collect(config, vault).await?;

    if json {
        let text = serde_json::to_string_pretty(&status)
            .map_err(|e| NodeVaultError::Internal(format!("failed to serialize status: {e}")))?;
        println!("{text}");
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_status(&status, use_color);
    }
    Ok(())
}

fn print_status(status: &StatusResponse, use_color: bool) {
    println!();
    println!("  nodevault status");
    println!("  {}", "-".repeat(35));

    match (status.vault_exists, use_color) {
        (true, true) => {
            use colored::Colorize;
            println!("    Vault:    {} {}", "✓".green(), "saved".green());
        }
        (true, false) => println!("    Vault:    [OK] saved"),
        (false, true) => {
            use colored::Colorize;
            println!("    Vault:    {} {}", "✗".yellow(), "not created".yellow());
        }
        (false, false) => println!("    Vault:    [--] not created"),
    }

    println!("    Database: {}", status.database_path);
    println!("    Key:      {}", status.storage_key);
    println!("    Auto-lock check: every {}s", status.auto_lock_check_secs);
    if !status.vault_exists {
        println!();
        println!("  Create one with: nodevault shell, then `unlock`");
    }
    println!();
}
