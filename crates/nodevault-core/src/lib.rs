// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for NodeVault.
//!
//! Holds the error type shared across the workspace, the vault document
//! model (nodes, wallets, airdrops, preferences), and the storage trait the
//! vault controller persists through.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BoxError, NodeVaultError};
pub use traits::KeyValueStore;
pub use types::{
    Airdrop, AirdropDraft, AirdropPatch, Language, Node, NodeDraft, NodePatch, Preferences,
    PreferencesPatch, Record, RecordKind, Theme, VaultDocument, Wallet, WalletDraft, WalletPatch,
};
