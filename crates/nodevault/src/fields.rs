// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `key=value` argument parsing into record drafts and patches.
//!
//! Keys are matched case-insensitively with `_` and `-` ignored, so
//! `publicAddress`, `public_address` and `public-address` are the same key.

use nodevault_core::{
    AirdropDraft, AirdropPatch, Language, NodeDraft, NodePatch, NodeVaultError, PreferencesPatch,
    Theme, WalletDraft, WalletPatch,
};

/// Parsed `key=value` pairs in input order, keys normalized.
pub type Fields = Vec<(String, String)>;

pub fn parse_fields(args: &[String]) -> Result<Fields, NodeVaultError> {
    args.iter()
        .map(|arg| {
            let (key, value) = arg.split_once('=').ok_or_else(|| {
                NodeVaultError::Validation(format!("expected key=value, got `{arg}`"))
            })?;
            let key = normalize_key(key);
            if key.is_empty() {
                return Err(NodeVaultError::Validation(format!("missing key in `{arg}`")));
            }
            Ok((key, value.to_string()))
        })
        .collect()
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

fn unknown(key: &str, allowed: &str) -> NodeVaultError {
    NodeVaultError::Validation(format!("unknown field `{key}` (expected one of: {allowed})"))
}

fn required(value: Option<String>, name: &str) -> Result<String, NodeVaultError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(NodeVaultError::Validation(format!("{name} is required"))),
    }
}

fn non_empty(value: Option<String>, name: &str) -> Result<Option<String>, NodeVaultError> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(NodeVaultError::Validation(format!("{name} cannot be empty")))
        }
        other => Ok(other.map(|v| v.trim().to_string())),
    }
}

fn split_tags(value: &str) -> Vec<String> {
    value.split(',').map(str::to_string).collect()
}

const NODE_FIELDS: &str = "name, network, nodeId, address, notes";
const WALLET_FIELDS: &str = "name, network, address, notes";
const AIRDROP_FIELDS: &str = "label, url, tags, notes";
const PREF_FIELDS: &str = "language, theme, autoLock";

pub fn node_patch(fields: Fields) -> Result<NodePatch, NodeVaultError> {
    let mut patch = NodePatch::default();
    for (key, value) in fields {
        match key.as_str() {
            "name" => patch.name = Some(value),
            "network" => patch.network = Some(value),
            "nodeid" | "id" => patch.node_id = Some(value),
            "address" | "publicaddress" => patch.public_address = Some(value),
            "notes" => patch.notes = Some(value),
            _ => return Err(unknown(&key, NODE_FIELDS)),
        }
    }
    patch.name = non_empty(patch.name, "name")?;
    patch.network = non_empty(patch.network, "network")?;
    Ok(patch)
}

pub fn node_draft(fields: Fields) -> Result<NodeDraft, NodeVaultError> {
    let patch = node_patch(fields)?;
    Ok(NodeDraft {
        name: required(patch.name, "name")?,
        network: required(patch.network, "network")?,
        node_id: patch.node_id.unwrap_or_default(),
        public_address: patch.public_address.unwrap_or_default(),
        notes: patch.notes.unwrap_or_default(),
    })
}

pub fn wallet_patch(fields: Fields) -> Result<WalletPatch, NodeVaultError> {
    let mut patch = WalletPatch::default();
    for (key, value) in fields {
        match key.as_str() {
            "name" => patch.name = Some(value),
            "network" => patch.network = Some(value),
            "address" | "publicaddress" => patch.public_address = Some(value),
            "notes" => patch.notes = Some(value),
            _ => return Err(unknown(&key, WALLET_FIELDS)),
        }
    }
    patch.name = non_empty(patch.name, "name")?;
    patch.network = non_empty(patch.network, "network")?;
    Ok(patch)
}

pub fn wallet_draft(fields: Fields) -> Result<WalletDraft, NodeVaultError> {
    let patch = wallet_patch(fields)?;
    Ok(WalletDraft {
        name: required(patch.name, "name")?,
        network: required(patch.network, "network")?,
        public_address: patch.public_address.unwrap_or_default(),
        notes: patch.notes.unwrap_or_default(),
    })
}

pub fn airdrop_patch(fields: Fields) -> Result<AirdropPatch, NodeVaultError> {
    let mut patch = AirdropPatch::default();
    for (key, value) in fields {
        match key.as_str() {
            "label" => patch.label = Some(value),
            "url" => patch.url = Some(value),
            "tags" => patch.tags = Some(split_tags(&value)),
            "notes" => patch.notes = Some(value),
            _ => return Err(unknown(&key, AIRDROP_FIELDS)),
        }
    }
    patch.label = non_empty(patch.label, "label")?;
    Ok(patch)
}

pub fn airdrop_draft(fields: Fields) -> Result<AirdropDraft, NodeVaultError> {
    let patch = airdrop_patch(fields)?;
    Ok(AirdropDraft {
        label: required(patch.label, "label")?,
        url: patch.url.unwrap_or_default(),
        tags: patch.tags.unwrap_or_default(),
        notes: patch.notes.unwrap_or_default(),
    })
}

pub fn preferences_patch(fields: Fields) -> Result<PreferencesPatch, NodeVaultError> {
    let mut patch = PreferencesPatch::default();
    for (key, value) in fields {
        match key.as_str() {
            "language" | "lang" => {
                patch.language = Some(value.parse::<Language>().map_err(|_| {
                    NodeVaultError::Validation(format!("unknown language `{value}` (en, fr, ar)"))
                })?);
            }
            "theme" => {
                patch.theme = Some(value.parse::<Theme>().map_err(|_| {
                    NodeVaultError::Validation(format!("unknown theme `{value}` (dark, light)"))
                })?);
            }
            "autolock" | "autolockminutes" => {
                patch.auto_lock_minutes = Some(value.trim().parse::<u32>().map_err(|_| {
                    NodeVaultError::Validation(format!(
                        "autoLock must be a whole number of minutes, got `{value}`"
                    ))
                })?);
            }
            _ => return Err(unknown(&key, PREF_FIELDS)),
        }
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(args: &[&str]) -> Fields {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        parse_fields(&args).unwrap()
    }

    #[test]
    fn keys_are_normalized() {
        let f = fields(&["Public_Address=0x1", "node-id=abc", "NAME=n"]);
        assert_eq!(f[0].0, "publicaddress");
        assert_eq!(f[1].0, "nodeid");
        assert_eq!(f[2].0, "name");
    }

    #[test]
    fn value_may_contain_equals() {
        let f = fields(&["url=https://x.org/?a=b"]);
        assert_eq!(f[0].1, "https://x.org/?a=b");
    }

    #[test]
    fn missing_equals_is_rejected() {
        assert!(parse_fields(&["name".to_string()]).is_err());
        assert!(parse_fields(&["=value".to_string()]).is_err());
    }

    #[test]
    fn node_requires_name_and_network() {
        let err = node_draft(fields(&["name=a"])).unwrap_err();
        assert!(err.to_string().contains("network is required"));
        let err = node_draft(fields(&["network=x", "name=  "])).unwrap_err();
        assert!(err.to_string().contains("name"));

        let draft = node_draft(fields(&["name= a ", "network=x", "address=1.2.3.4"])).unwrap();
        assert_eq!(draft.name, "a");
        assert_eq!(draft.public_address, "1.2.3.4");
    }

    #[test]
    fn patch_cannot_blank_required_field() {
        assert!(wallet_patch(fields(&["network="])).is_err());
        let patch = wallet_patch(fields(&["notes="])).unwrap();
        assert_eq!(patch.notes.as_deref(), Some(""));
    }

    #[test]
    fn unknown_field_lists_allowed_ones() {
        let err = wallet_draft(fields(&["colour=red"])).unwrap_err();
        assert!(err.to_string().contains("colour"));
        assert!(err.to_string().contains("address"));
    }

    #[test]
    fn airdrop_tags_are_comma_separated() {
        let draft = airdrop_draft(fields(&["label=drop", "tags=zk, l2,,zk"])).unwrap();
        assert_eq!(draft.tags, vec!["zk", " l2", "", "zk"]);
        assert!(airdrop_draft(fields(&["url=https://x"])).is_err());
    }

    #[test]
    fn preferences_parse() {
        let patch = preferences_patch(fields(&["lang=FR", "theme=light", "autoLock=5"])).unwrap();
        assert_eq!(patch.language, Some(Language::Fr));
        assert_eq!(patch.theme, Some(Theme::Light));
        assert_eq!(patch.auto_lock_minutes, Some(5));

        assert!(preferences_patch(fields(&["theme=blue"])).is_err());
        assert!(preferences_patch(fields(&["autolock=soon"])).is_err());
    }
}
