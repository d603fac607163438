// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the vault and its collaborators.

pub mod storage;

pub use storage::KeyValueStore;
