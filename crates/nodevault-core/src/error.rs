// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for NodeVault.
//!
//! Cryptographic failures are deliberately coarse once they leave the codec:
//! callers only ever see [`NodeVaultError::InvalidPasswordOrCorruptData`] or,
//! at the controller boundary, [`NodeVaultError::InvalidPassword`].

use thiserror::Error;

use crate::types::RecordKind;

/// Boxed error source carried by wrapping variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The error type shared by every NodeVault crate.
#[derive(Debug, Error)]
pub enum NodeVaultError {
    /// Configuration errors (invalid TOML, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage collaborator failure (database open, read, write).
    #[error("storage error: {source}")]
    Storage { source: BoxError },

    /// Key derivation was handed malformed parameters. Always a caller bug.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// AEAD tag verification failed. Never leaves the codec.
    #[error("authentication tag verification failed")]
    Authentication,

    /// Envelope fields have the wrong shape, length, or encoding.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Decryption succeeded but the plaintext is not a vault document.
    #[error("malformed vault document: {0}")]
    MalformedDocument(String),

    /// Wrong password, or the envelope was corrupted or tampered with.
    #[error("invalid password or corrupt data")]
    InvalidPasswordOrCorruptData,

    /// Unlock failed. Deliberately does not say why.
    #[error("invalid password")]
    InvalidPassword,

    /// Sealing or writing the vault failed.
    #[error("failed to save vault")]
    Save {
        #[source]
        source: BoxError,
    },

    /// Opening an imported envelope failed.
    #[error("failed to import vault")]
    Import {
        #[source]
        source: BoxError,
    },

    /// The operation requires an unlocked vault.
    #[error("vault is locked")]
    Locked,

    /// `unlock` was called on a vault that is already unlocked.
    #[error("vault is already unlocked")]
    AlreadyUnlocked,

    /// No record with the given id exists in the collection.
    #[error("{kind} not found: {id}")]
    RecordNotFound { kind: RecordKind, id: String },

    /// The password could not be read from the environment or terminal.
    #[error("password prompt failed: {0}")]
    Prompt(String),

    /// A value supplied by the caller failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl NodeVaultError {
    /// Wrap any error as a storage failure.
    pub fn storage(source: impl Into<BoxError>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }
}
