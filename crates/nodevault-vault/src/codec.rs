// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault codec: document + password to envelope and back.
//!
//! Every seal draws a fresh salt and nonce, so the same document sealed twice
//! never yields the same envelope. On open, a failed tag check is reported as
//! [`NodeVaultError::InvalidPasswordOrCorruptData`]; the codec cannot tell a
//! wrong password from a tampered envelope.

use nodevault_core::{NodeVaultError, VaultDocument};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use crate::crypto;
use crate::envelope::EncryptedEnvelope;
use crate::kdf;

/// Serialize, derive a key under a fresh salt, and encrypt under a fresh nonce.
pub fn seal(
    document: &VaultDocument,
    password: &SecretString,
) -> Result<EncryptedEnvelope, NodeVaultError> {
    let plaintext = Zeroizing::new(serde_json::to_vec(document).map_err(|e| {
        NodeVaultError::MalformedDocument(format!("failed to serialize document: {e}"))
    })?);

    let salt = kdf::generate_salt()?;
    let nonce = crypto::generate_nonce()?;
    let key = kdf::derive_key(password.expose_secret().as_bytes(), &salt)?;
    let ciphertext = crypto::seal(&key, &nonce, &plaintext)?;

    Ok(EncryptedEnvelope::from_parts(&salt, &nonce, &ciphertext))
}

/// Decode, derive, decrypt, and deserialize an envelope.
pub fn open(
    envelope: &EncryptedEnvelope,
    password: &SecretString,
) -> Result<VaultDocument, NodeVaultError> {
    let decoded = envelope.decode()?;
    let key = kdf::derive_key(password.expose_secret().as_bytes(), &decoded.salt)?;
    let plaintext = Zeroizing::new(
        crypto::open(&key, &decoded.nonce, &decoded.ciphertext).map_err(|e| match e {
            NodeVaultError::Authentication => NodeVaultError::InvalidPasswordOrCorruptData,
            other => other,
        })?,
    );

    let document: VaultDocument = serde_json::from_slice(&plaintext)
        .map_err(|e| NodeVaultError::MalformedDocument(e.to_string()))?;
    if document.has_duplicate_ids() {
        return Err(NodeVaultError::MalformedDocument(
            "duplicate record ids within a collection".to_string(),
        ));
    }
    Ok(document)
}

/// Parse the JSON transport text and open it in one step.
pub fn open_str(text: &str, password: &SecretString) -> Result<VaultDocument, NodeVaultError> {
    open(&EncryptedEnvelope::from_json(text)?, password)
}
