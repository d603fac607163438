// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault domain types: records, preferences, and the vault document.
//!
//! The serialized form uses camelCase keys so documents written by earlier
//! NodeVault front-ends remain readable.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::NodeVaultError;

/// Default auto-lock timeout in minutes.
pub const DEFAULT_AUTO_LOCK_MINUTES: u32 = 15;

/// Generate a fresh opaque record identifier.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The three record collections held by a vault.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Node,
    Wallet,
    Airdrop,
}

/// UI language preference.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
    Ar,
}

/// UI theme preference.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// User preferences. Survive a lock so theme and language stay put.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub language: Language,
    pub theme: Theme,
    /// Idle minutes before the vault locks itself. Zero is rejected on read.
    pub auto_lock_minutes: NonZeroU32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: Language::default(),
            theme: Theme::default(),
            auto_lock_minutes: NonZeroU32::new(DEFAULT_AUTO_LOCK_MINUTES)
                .unwrap_or(NonZeroU32::MIN),
        }
    }
}

/// Partial update for [`Preferences`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesPatch {
    pub language: Option<Language>,
    pub theme: Option<Theme>,
    pub auto_lock_minutes: Option<u32>,
}

impl Preferences {
    /// Apply a partial update. Fails without modifying anything if the
    /// auto-lock timeout is zero.
    pub fn apply(&mut self, patch: PreferencesPatch) -> Result<(), NodeVaultError> {
        let minutes = match patch.auto_lock_minutes {
            Some(m) => Some(NonZeroU32::new(m).ok_or_else(|| {
                NodeVaultError::Validation("autoLockMinutes must be a positive integer".to_string())
            })?),
            None => None,
        };
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(minutes) = minutes {
            self.auto_lock_minutes = minutes;
        }
        Ok(())
    }
}

/// A blockchain node the user operates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: String,
    pub network: String,
    pub node_id: String,
    pub public_address: String,
    #[serde(default)]
    pub notes: String,
}

/// Fields for a new [`Node`]; the id is assigned on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeDraft {
    pub name: String,
    pub network: String,
    pub node_id: String,
    pub public_address: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    pub name: Option<String>,
    pub network: Option<String>,
    pub node_id: Option<String>,
    pub public_address: Option<String>,
    pub notes: Option<String>,
}

/// A wallet address. Only public metadata is stored, never key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub name: String,
    pub network: String,
    pub public_address: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletDraft {
    pub name: String,
    pub network: String,
    pub public_address: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletPatch {
    pub name: Option<String>,
    pub network: Option<String>,
    pub public_address: Option<String>,
    pub notes: Option<String>,
}

/// A tracked airdrop link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airdrop {
    pub id: String,
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirdropDraft {
    pub label: String,
    pub url: String,
    pub tags: Vec<String>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirdropPatch {
    pub label: Option<String>,
    pub url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

/// Trim tags, drop empty ones, and keep the first occurrence of duplicates.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Common behaviour of the three record kinds, so the document and the
/// lifecycle controller can handle them with one generic code path.
pub trait Record: Clone + Send + Sync + 'static {
    const KIND: RecordKind;
    type Draft: Send + 'static;
    type Patch: Send + 'static;

    fn from_draft(id: String, draft: Self::Draft) -> Self;
    fn id(&self) -> &str;
    fn apply(&mut self, patch: Self::Patch);
    /// Case-insensitive search over the record's searchable fields.
    fn matches(&self, term: &str) -> bool;
    fn collection(document: &VaultDocument) -> &[Self];
    fn collection_mut(document: &mut VaultDocument) -> &mut Vec<Self>;
}

impl Record for Node {
    const KIND: RecordKind = RecordKind::Node;
    type Draft = NodeDraft;
    type Patch = NodePatch;

    fn from_draft(id: String, d: NodeDraft) -> Self {
        Self {
            id,
            name: d.name,
            network: d.network,
            node_id: d.node_id,
            public_address: d.public_address,
            notes: d.notes,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, p: NodePatch) {
        if let Some(v) = p.name {
            self.name = v;
        }
        if let Some(v) = p.network {
            self.network = v;
        }
        if let Some(v) = p.node_id {
            self.node_id = v;
        }
        if let Some(v) = p.public_address {
            self.public_address = v;
        }
        if let Some(v) = p.notes {
            self.notes = v;
        }
    }

    fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        contains_ci(&self.name, &term)
            || contains_ci(&self.network, &term)
            || contains_ci(&self.node_id, &term)
            || contains_ci(&self.public_address, &term)
    }

    fn collection(document: &VaultDocument) -> &[Self] {
        &document.nodes
    }

    fn collection_mut(document: &mut VaultDocument) -> &mut Vec<Self> {
        &mut document.nodes
    }
}

impl Record for Wallet {
    const KIND: RecordKind = RecordKind::Wallet;
    type Draft = WalletDraft;
    type Patch = WalletPatch;

    fn from_draft(id: String, d: WalletDraft) -> Self {
        Self {
            id,
            name: d.name,
            network: d.network,
            public_address: d.public_address,
            notes: d.notes,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, p: WalletPatch) {
        if let Some(v) = p.name {
            self.name = v;
        }
        if let Some(v) = p.network {
            self.network = v;
        }
        if let Some(v) = p.public_address {
            self.public_address = v;
        }
        if let Some(v) = p.notes {
            self.notes = v;
        }
    }

    fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        contains_ci(&self.name, &term)
            || contains_ci(&self.network, &term)
            || contains_ci(&self.public_address, &term)
    }

    fn collection(document: &VaultDocument) -> &[Self] {
        &document.wallets
    }

    fn collection_mut(document: &mut VaultDocument) -> &mut Vec<Self> {
        &mut document.wallets
    }
}

impl Record for Airdrop {
    const KIND: RecordKind = RecordKind::Airdrop;
    type Draft = AirdropDraft;
    type Patch = AirdropPatch;

    fn from_draft(id: String, d: AirdropDraft) -> Self {
        Self {
            id,
            label: d.label,
            url: d.url,
            tags: normalize_tags(d.tags),
            notes: d.notes,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, p: AirdropPatch) {
        if let Some(v) = p.label {
            self.label = v;
        }
        if let Some(v) = p.url {
            self.url = v;
        }
        if let Some(v) = p.tags {
            self.tags = normalize_tags(v);
        }
        if let Some(v) = p.notes {
            self.notes = v;
        }
    }

    fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        contains_ci(&self.label, &term)
            || contains_ci(&self.url, &term)
            || self.tags.iter().any(|t| contains_ci(t, &term))
    }

    fn collection(document: &VaultDocument) -> &[Self] {
        &document.airdrops
    }

    fn collection_mut(document: &mut VaultDocument) -> &mut Vec<Self> {
        &mut document.airdrops
    }
}

/// The plaintext vault payload. Serialized wholesale by the codec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub wallets: Vec<Wallet>,
    #[serde(default)]
    pub airdrops: Vec<Airdrop>,
    #[serde(default)]
    pub preferences: Preferences,
}

impl VaultDocument {
    /// An empty document carrying the given preferences.
    pub fn with_preferences(preferences: Preferences) -> Self {
        Self {
            preferences,
            ..Self::default()
        }
    }

    pub fn records<R: Record>(&self) -> &[R] {
        R::collection(self)
    }

    /// Insert a new record built from `draft` and return its freshly assigned id.
    pub fn insert<R: Record>(&mut self, draft: R::Draft) -> String {
        let collection = R::collection_mut(self);
        let mut id = new_record_id();
        // v4 collisions are practically impossible, but ids must stay unique.
        while collection.iter().any(|r| r.id() == id) {
            id = new_record_id();
        }
        collection.push(R::from_draft(id.clone(), draft));
        id
    }

    pub fn update<R: Record>(&mut self, id: &str, patch: R::Patch) -> Result<(), NodeVaultError> {
        let record = R::collection_mut(self)
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| not_found::<R>(id))?;
        record.apply(patch);
        Ok(())
    }

    pub fn remove<R: Record>(&mut self, id: &str) -> Result<R, NodeVaultError> {
        let collection = R::collection_mut(self);
        let index = collection
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| not_found::<R>(id))?;
        Ok(collection.remove(index))
    }

    /// Remove every record whose id is in `ids`. Unknown ids are ignored.
    /// Returns how many records were removed.
    pub fn remove_many<R: Record>(&mut self, ids: &[String]) -> usize {
        let collection = R::collection_mut(self);
        let before = collection.len();
        collection.retain(|r| !ids.iter().any(|id| id == r.id()));
        before - collection.len()
    }

    /// Whether any collection holds two records with the same id.
    pub fn has_duplicate_ids(&self) -> bool {
        fn dupes<R: Record>(records: &[R]) -> bool {
            let mut seen = std::collections::HashSet::new();
            records.iter().any(|r| !seen.insert(r.id()))
        }
        dupes(&self.nodes) || dupes(&self.wallets) || dupes(&self.airdrops)
    }
}

fn not_found<R: Record>(id: &str) -> NodeVaultError {
    NodeVaultError::RecordNotFound {
        kind: R::KIND,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_draft(name: &str) -> NodeDraft {
        NodeDraft {
            name: name.to_string(),
            network: "solana".to_string(),
            node_id: "validator-1".to_string(),
            public_address: "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn insert_assigns_unique_ids() {
        let mut doc = VaultDocument::default();
        let a = doc.insert::<Node>(node_draft("a"));
        let b = doc.insert::<Node>(node_draft("b"));
        assert_ne!(a, b);
        assert_eq!(doc.nodes.len(), 2);
        assert!(!doc.has_duplicate_ids());
    }

    #[test]
    fn update_keeps_id_and_applies_only_set_fields() {
        let mut doc = VaultDocument::default();
        let id = doc.insert::<Node>(node_draft("before"));
        doc.update::<Node>(
            &id,
            NodePatch {
                name: Some("after".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        let node = &doc.nodes[0];
        assert_eq!(node.id, id);
        assert_eq!(node.name, "after");
        assert_eq!(node.network, "solana");
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut doc = VaultDocument::default();
        let err = doc
            .update::<Wallet>("missing", WalletPatch::default())
            .unwrap_err();
        assert!(matches!(
            err,
            NodeVaultError::RecordNotFound { kind: RecordKind::Wallet, ref id } if id == "missing"
        ));
    }

    #[test]
    fn remove_many_ignores_unknown_ids() {
        let mut doc = VaultDocument::default();
        let a = doc.insert::<Node>(node_draft("a"));
        let _b = doc.insert::<Node>(node_draft("b"));
        let removed = doc.remove_many::<Node>(&[a, "nope".to_string()]);
        assert_eq!(removed, 1);
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes[0].name, "b");
    }

    #[test]
    fn airdrop_tags_are_normalized() {
        let mut doc = VaultDocument::default();
        doc.insert::<Airdrop>(AirdropDraft {
            label: "L2 drop".to_string(),
            url: "https://example.org".to_string(),
            tags: vec![" defi ".into(), "".into(), "defi".into(), "l2".into()],
            notes: String::new(),
        });
        assert_eq!(doc.airdrops[0].tags, vec!["defi", "l2"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let mut doc = VaultDocument::default();
        doc.insert::<Airdrop>(AirdropDraft {
            label: "Testnet".to_string(),
            url: "https://example.org".to_string(),
            tags: vec!["Zk".into()],
            notes: "ignored by search".to_string(),
        });
        let airdrop = &doc.airdrops[0];
        assert!(airdrop.matches("zk"));
        assert!(airdrop.matches("TESTNET"));
        assert!(!airdrop.matches("ignored"));
    }

    #[test]
    fn zero_auto_lock_is_rejected_without_partial_update() {
        let mut prefs = Preferences::default();
        let err = prefs
            .apply(PreferencesPatch {
                theme: Some(Theme::Light),
                auto_lock_minutes: Some(0),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, NodeVaultError::Validation(_)));
        assert_eq!(prefs.theme, Theme::Dark);
    }

    #[test]
    fn document_json_uses_camel_case() {
        let mut doc = VaultDocument::default();
        doc.insert::<Node>(node_draft("n"));
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json["nodes"][0].get("nodeId").is_some());
        assert!(json["nodes"][0].get("publicAddress").is_some());
        assert_eq!(json["preferences"]["autoLockMinutes"], 15);
        assert_eq!(json["preferences"]["language"], "en");
        assert_eq!(json["preferences"]["theme"], "dark");
    }

    #[test]
    fn document_with_zero_auto_lock_fails_to_parse() {
        let raw = r#"{"nodes":[],"wallets":[],"airdrops":[],
            "preferences":{"language":"fr","theme":"light","autoLockMinutes":0}}"#;
        assert!(serde_json::from_str::<VaultDocument>(raw).is_err());
    }

    #[test]
    fn record_kind_parses_case_insensitively() {
        use std::str::FromStr;
        assert_eq!(RecordKind::from_str("Wallet").unwrap(), RecordKind::Wallet);
        assert_eq!(RecordKind::Airdrop.to_string(), "airdrop");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn json_roundtrip_preserves_document(
                names in proptest::collection::vec(".{0,24}", 0..6),
                tags in proptest::collection::vec("[a-z]{1,8}", 0..4),
                minutes in 1u32..=240,
            ) {
                let mut doc = VaultDocument::default();
                doc.preferences.auto_lock_minutes = NonZeroU32::new(minutes).unwrap();
                for name in &names {
                    doc.insert::<Wallet>(WalletDraft { name: name.clone(), ..Default::default() });
                    doc.insert::<Airdrop>(AirdropDraft {
                        label: name.clone(),
                        tags: tags.clone(),
                        ..Default::default()
                    });
                }
                let json = serde_json::to_vec(&doc).unwrap();
                let back: VaultDocument = serde_json::from_slice(&json).unwrap();
                prop_assert_eq!(back, doc);
            }
        }
    }
}
