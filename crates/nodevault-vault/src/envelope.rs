// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The encrypted envelope: the only form in which a vault leaves memory.
//!
//! Transport form is a JSON object with exactly three lowercase-hex string
//! fields, `data` (ciphertext with tag), `salt` (16 bytes), and `iv` (12 bytes).

use nodevault_core::NodeVaultError;
use serde::{Deserialize, Serialize};

use crate::crypto::{NONCE_LEN, TAG_LEN};
use crate::kdf::SALT_LEN;

/// Hex-encoded envelope as stored and exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncryptedEnvelope {
    pub data: String,
    pub salt: String,
    pub iv: String,
}

/// Envelope fields decoded to raw bytes with lengths checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEnvelope {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

impl EncryptedEnvelope {
    /// Encode raw envelope parts.
    pub fn from_parts(salt: &[u8; SALT_LEN], nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Self {
        Self {
            data: hex::encode(ciphertext),
            salt: hex::encode(salt),
            iv: hex::encode(nonce),
        }
    }

    /// Parse the JSON transport form.
    pub fn from_json(text: &str) -> Result<Self, NodeVaultError> {
        serde_json::from_str(text).map_err(|e| NodeVaultError::MalformedEnvelope(e.to_string()))
    }

    /// Serialize to the JSON transport form.
    pub fn to_json(&self) -> Result<String, NodeVaultError> {
        serde_json::to_string(self)
            .map_err(|e| NodeVaultError::Internal(format!("failed to serialize envelope: {e}")))
    }

    /// Decode and length-check all three fields.
    pub fn decode(&self) -> Result<DecodedEnvelope, NodeVaultError> {
        let salt = decode_fixed::<SALT_LEN>("salt", &self.salt)?;
        let nonce = decode_fixed::<NONCE_LEN>("iv", &self.iv)?;
        let ciphertext = decode_hex("data", &self.data)?;
        if ciphertext.len() < TAG_LEN {
            return Err(NodeVaultError::MalformedEnvelope(format!(
                "data must be at least {TAG_LEN} bytes, got {}",
                ciphertext.len()
            )));
        }
        Ok(DecodedEnvelope {
            salt,
            nonce,
            ciphertext,
        })
    }
}

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, NodeVaultError> {
    hex::decode(value).map_err(|e| {
        NodeVaultError::MalformedEnvelope(format!("field `{field}` is not valid hex: {e}"))
    })
}

fn decode_fixed<const N: usize>(field: &str, value: &str) -> Result<[u8; N], NodeVaultError> {
    let bytes = decode_hex(field, value)?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        NodeVaultError::MalformedEnvelope(format!("field `{field}` must be {N} bytes, got {len}"))
    })
}
