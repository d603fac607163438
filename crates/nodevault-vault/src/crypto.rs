// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM seal/open.
//!
//! The caller supplies the nonce. It must be fresh for every seal under a
//! given key; [`crate::codec`] draws a new salt and nonce per envelope.

use nodevault_core::NodeVaultError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

use crate::kdf::KEY_LEN;

/// Nonce (IV) length in bytes.
pub const NONCE_LEN: usize = 12;

/// GCM authentication tag length in bytes, appended to the ciphertext.
pub const TAG_LEN: usize = 16;

fn cipher_key(key: &[u8; KEY_LEN]) -> Result<LessSafeKey, NodeVaultError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| NodeVaultError::Internal("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext`, returning ciphertext with the 16-byte tag appended.
pub fn seal(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, NodeVaultError> {
    let key = cipher_key(key)?;
    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(Nonce::assume_unique_for_key(*nonce), Aad::empty(), &mut in_out)
        .map_err(|_| NodeVaultError::Internal("AES-256-GCM encryption failed".to_string()))?;
    Ok(in_out)
}

/// Decrypt and verify `ciphertext` (tag included).
///
/// Fails with [`NodeVaultError::Authentication`] on a wrong key, wrong nonce,
/// or any modification; no plaintext is returned in that case.
pub fn open(
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, NodeVaultError> {
    let key = cipher_key(key)?;
    let mut in_out = ciphertext.to_vec();
    let plaintext = key
        .open_in_place(Nonce::assume_unique_for_key(*nonce), Aad::empty(), &mut in_out)
        .map_err(|_| NodeVaultError::Authentication)?;
    Ok(plaintext.to_vec())
}

/// Generate a random nonce from the system CSPRNG.
pub fn generate_nonce() -> Result<[u8; NONCE_LEN], NodeVaultError> {
    random_bytes()
}

/// Fill a fixed-size array from the system CSPRNG.
pub(crate) fn random_bytes<const N: usize>() -> Result<[u8; N], NodeVaultError> {
    let mut bytes = [0u8; N];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| NodeVaultError::Internal("system random generator failed".to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> [u8; KEY_LEN] {
        random_bytes().unwrap()
    }

    #[test]
    fn seal_open_roundtrip() {
        let key = key();
        let nonce = generate_nonce().unwrap();
        let ciphertext = seal(&key, &nonce, b"validator notes").unwrap();
        assert_eq!(open(&key, &nonce, &ciphertext).unwrap(), b"validator notes");
    }

    #[test]
    fn ciphertext_carries_tag() {
        let key = key();
        let nonce = generate_nonce().unwrap();
        let ciphertext = seal(&key, &nonce, b"hello").unwrap();
        assert_eq!(ciphertext.len(), 5 + TAG_LEN);
    }

    #[test]
    fn empty_plaintext_still_authenticates() {
        let key = key();
        let nonce = generate_nonce().unwrap();
        let ciphertext = seal(&key, &nonce, b"").unwrap();
        assert_eq!(ciphertext.len(), TAG_LEN);
        assert!(open(&key, &nonce, &ciphertext).unwrap().is_empty());
    }

    #[test]
    fn wrong_key_fails() {
        let nonce = generate_nonce().unwrap();
        let ciphertext = seal(&key(), &nonce, b"secret").unwrap();
        assert!(matches!(
            open(&key(), &nonce, &ciphertext),
            Err(NodeVaultError::Authentication)
        ));
    }

    #[test]
    fn wrong_nonce_fails() {
        let key = key();
        let ciphertext = seal(&key, &[1u8; NONCE_LEN], b"secret").unwrap();
        assert!(matches!(
            open(&key, &[2u8; NONCE_LEN], &ciphertext),
            Err(NodeVaultError::Authentication)
        ));
    }

    #[test]
    fn every_flipped_byte_is_detected() {
        let key = key();
        let nonce = generate_nonce().unwrap();
        let ciphertext = seal(&key, &nonce, b"{\"nodes\":[],\"wallets\":[]}").unwrap();
        for i in 0..ciphertext.len() {
            let mut tampered = ciphertext.clone();
            tampered[i] ^= 0x80;
            assert!(
                matches!(open(&key, &nonce, &tampered), Err(NodeVaultError::Authentication)),
                "flip at byte {i} went undetected"
            );
        }
    }

    #[test]
    fn truncated_ciphertext_fails() {
        let key = key();
        let nonce = generate_nonce().unwrap();
        let ciphertext = seal(&key, &nonce, b"secret").unwrap();
        assert!(open(&key, &nonce, &ciphertext[..ciphertext.len() - 1]).is_err());
        assert!(open(&key, &nonce, &[]).is_err());
    }
}
