// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nodevault export` and `nodevault import` command implementation.
//!
//! Backups are envelope text files (conventionally `*.nv.enc`). Export
//! re-seals the stored vault under the master password with a fresh salt and
//! nonce; import opens a backup with its own password, then saves the result
//! under the master password.

use std::path::Path;

use nodevault_core::NodeVaultError;
use nodevault_vault::{
    EncryptedEnvelope, VaultController, get_import_password, get_master_password,
    get_new_master_password,
};
use tracing::info;

/// Unlock a vault that must already exist in storage.
pub async fn unlock_existing(vault: &VaultController) -> Result<(), NodeVaultError> {
    if !vault.is_locked().await {
        return Err(NodeVaultError::AlreadyUnlocked);
    }
    if !vault.has_stored_vault().await? {
        return Err(NodeVaultError::Validation(
            "no vault found; run `nodevault shell` and `unlock` to create one".to_string(),
        ));
    }
    vault.unlock(get_master_password()?).await
}

/// Unlock the stored vault, or create one with a confirmed new password.
///
/// Fails with `AlreadyUnlocked` before prompting if a session is open.
pub async fn unlock_or_create(vault: &VaultController) -> Result<bool, NodeVaultError> {
    if !vault.is_locked().await {
        return Err(NodeVaultError::AlreadyUnlocked);
    }
    if vault.has_stored_vault().await? {
        vault.unlock(get_master_password()?).await?;
        Ok(false)
    } else {
        vault.unlock(get_new_master_password()?).await?;
        Ok(true)
    }
}

/// Write envelope text to `path`.
pub async fn write_backup(path: &Path, envelope: &EncryptedEnvelope) -> Result<(), NodeVaultError> {
    tokio::fs::write(path, envelope.to_json()?)
        .await
        .map_err(NodeVaultError::storage)?;
    info!(path = %path.display(), "backup written");
    Ok(())
}

/// Read envelope text from `path`.
pub async fn read_backup(path: &Path) -> Result<String, NodeVaultError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(NodeVaultError::storage)
}

/// Run `nodevault export`.
pub async fn run_export(vault: &VaultController, output: &Path) -> Result<(), NodeVaultError> {
    unlock_existing(vault).await?;
    let result = async {
        let envelope = vault.export().await?;
        write_backup(output, &envelope).await
    }
    .await;
    vault.lock().await;
    result?;

    println!("exported vault to {}", output.display());
    Ok(())
}

/// Run `nodevault import`.
pub async fn run_import(vault: &VaultController, file: &Path) -> Result<(), NodeVaultError> {
    let text = read_backup(file).await?;
    let created = unlock_or_create(vault).await?;
    let result = async {
        vault.import(&text, get_import_password()?).await?;
        vault.save().await?;
        vault.document().await
    }
    .await;
    vault.lock().await;
    let document = result?;

    if created {
        println!("created a new vault");
    }
    println!(
        "imported {} node(s), {} wallet(s), {} airdrop(s) from {}",
        document.nodes.len(),
        document.wallets.len(),
        document.airdrops.len(),
        file.display()
    );
    Ok(())
}
