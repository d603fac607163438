// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from the master password.
//!
//! The iteration count is part of the envelope format: envelopes carry only
//! salt, nonce, and ciphertext, so every reader must derive with the same count.

use std::num::NonZeroU32;

use nodevault_core::NodeVaultError;
use ring::pbkdf2;
use zeroize::Zeroizing;

use crate::crypto;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count used for every envelope.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derive a 32-byte key from `password` and a 16-byte `salt`.
///
/// Deterministic for a given (password, salt). A salt of any other length is
/// rejected. The key is wrapped in [`Zeroizing`] so it is wiped on drop.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
) -> Result<Zeroizing<[u8; KEY_LEN]>, NodeVaultError> {
    if salt.len() != SALT_LEN {
        return Err(NodeVaultError::KeyDerivation(format!(
            "salt must be {SALT_LEN} bytes, got {}",
            salt.len()
        )));
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_sha256(password, salt, PBKDF2_ITERATIONS, &mut key[..])?;
    Ok(key)
}

fn pbkdf2_sha256(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    out: &mut [u8],
) -> Result<(), NodeVaultError> {
    let iterations = NonZeroU32::new(iterations).ok_or_else(|| {
        NodeVaultError::KeyDerivation("iteration count must be non-zero".to_string())
    })?;
    pbkdf2::derive(pbkdf2::PBKDF2_HMAC_SHA256, iterations, salt, password, out);
    Ok(())
}

/// Generate a random 16-byte salt from the system CSPRNG.
pub fn generate_salt() -> Result<[u8; SALT_LEN], NodeVaultError> {
    crypto::random_bytes()
}
