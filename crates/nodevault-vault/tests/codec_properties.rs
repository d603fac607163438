// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for the vault codec. Each case runs the full KDF, so the
//! case count is kept small.

use nodevault_core::{AirdropDraft, NodeDraft, NodeVaultError, VaultDocument, WalletDraft};
use nodevault_vault::{EncryptedEnvelope, codec};
use proptest::prelude::*;
use secrecy::SecretString;

fn arb_document() -> impl Strategy<Value = VaultDocument> {
    (
        prop::collection::vec(("[a-z0-9-]{1,12}", "[a-z]{0,8}", ".{0,20}"), 0..3),
        prop::collection::vec(("[a-z]{1,8}", "0x[0-9a-f]{8}"), 0..3),
        prop::collection::vec(("[ -~]{0,16}", prop::collection::vec("[a-z]{1,5}", 0..4)), 0..3),
    )
        .prop_map(|(nodes, wallets, airdrops)| {
            let mut doc = VaultDocument::default();
            for (name, network, notes) in nodes {
                doc.insert::<nodevault_core::Node>(NodeDraft {
                    name,
                    network,
                    notes,
                    ..NodeDraft::default()
                });
            }
            for (name, public_address) in wallets {
                doc.insert::<nodevault_core::Wallet>(WalletDraft {
                    name,
                    public_address,
                    ..WalletDraft::default()
                });
            }
            for (label, tags) in airdrops {
                doc.insert::<nodevault_core::Airdrop>(AirdropDraft {
                    label,
                    tags,
                    ..AirdropDraft::default()
                });
            }
            doc
        })
}

fn pw(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn open_inverts_seal(doc in arb_document(), password in ".{0,24}") {
        let envelope = codec::seal(&doc, &pw(&password)).unwrap();
        prop_assert_eq!(codec::open(&envelope, &pw(&password)).unwrap(), doc);
    }

    #[test]
    fn other_password_never_opens(doc in arb_document(), a in "[a-z]{1,12}", b in "[A-Z]{1,12}") {
        let envelope = codec::seal(&doc, &pw(&a)).unwrap();
        prop_assert!(matches!(
            codec::open(&envelope, &pw(&b)),
            Err(NodeVaultError::InvalidPasswordOrCorruptData)
        ));
    }

    #[test]
    fn flipped_data_byte_never_opens(
        doc in arb_document(),
        pos in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let envelope = codec::seal(&doc, &pw("pw")).unwrap();
        let mut data = hex::decode(&envelope.data).unwrap();
        let i = pos.index(data.len());
        data[i] ^= 1 << bit;
        let tampered = EncryptedEnvelope { data: hex::encode(data), ..envelope };
        prop_assert!(matches!(
            codec::open(&tampered, &pw("pw")),
            Err(NodeVaultError::InvalidPasswordOrCorruptData)
        ));
    }
}

#[test]
fn sealing_twice_gives_distinct_envelopes_that_both_open() {
    let mut doc = VaultDocument::default();
    doc.insert::<nodevault_core::Node>(NodeDraft {
        name: "same".into(),
        ..NodeDraft::default()
    });
    let a = codec::seal(&doc, &pw("pw")).unwrap();
    let b = codec::seal(&doc, &pw("pw")).unwrap();
    assert_ne!(a, b);
    assert_eq!(codec::open(&a, &pw("pw")).unwrap(), doc);
    assert_eq!(codec::open(&b, &pw("pw")).unwrap(), doc);
}

#[test]
fn envelope_text_survives_storage_roundtrip_byte_for_byte() {
    let envelope = codec::seal(&VaultDocument::default(), &pw("pw")).unwrap();
    let text = envelope.to_json().unwrap();
    let reparsed = EncryptedEnvelope::from_json(&text).unwrap();
    assert_eq!(reparsed.to_json().unwrap(), text);
}
