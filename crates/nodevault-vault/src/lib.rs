// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password-based vault encryption and session lifecycle for NodeVault.
//!
//! The vault document is serialized, encrypted with AES-256-GCM under a key
//! derived from the master password by PBKDF2-HMAC-SHA256, and stored as a
//! hex-encoded JSON envelope. [`VaultController`] holds the decrypted document
//! while unlocked and locks itself after a period of inactivity.

pub mod codec;
pub mod controller;
pub mod crypto;
pub mod envelope;
pub mod kdf;
pub mod prompt;
mod session;

pub use controller::{ControllerSettings, VaultController};
pub use envelope::EncryptedEnvelope;
pub use prompt::{get_import_password, get_master_password, get_new_master_password};
