// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record rendering for the terminal and CSV export, and the `nodevault list`
//! command.

use std::path::Path;

use colored::Colorize;
use nodevault_core::{Airdrop, Node, NodeVaultError, Record, RecordKind, Wallet};
use nodevault_vault::VaultController;

/// Tabular view of a record kind. The id is rendered separately and never
/// exported to CSV.
pub trait Row: Record {
    const HEADERS: &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

impl Row for Node {
    const HEADERS: &'static [&'static str] =
        &["name", "network", "nodeId", "publicAddress", "notes"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.network.clone(),
            self.node_id.clone(),
            self.public_address.clone(),
            self.notes.clone(),
        ]
    }
}

impl Row for Wallet {
    const HEADERS: &'static [&'static str] = &["name", "network", "publicAddress", "notes"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.network.clone(),
            self.public_address.clone(),
            self.notes.clone(),
        ]
    }
}

impl Row for Airdrop {
    const HEADERS: &'static [&'static str] = &["label", "url", "tags", "notes"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.label.clone(),
            self.url.clone(),
            self.tags.join(", "),
            self.notes.clone(),
        ]
    }
}

/// Print records one per block: id on the first line, then non-empty fields.
pub fn print_records<R: Row>(records: &[R]) {
    if records.is_empty() {
        println!("{}", format!("no {}s", R::KIND).dimmed());
        return;
    }
    for record in records {
        println!("{}", record.id().cyan());
        for (header, cell) in R::HEADERS.iter().zip(record.cells()) {
            if !cell.is_empty() {
                println!("  {:<14} {cell}", format!("{header}:").dimmed());
            }
        }
    }
    println!("{}", format!("{} {}(s)", records.len(), R::KIND).dimmed());
}

/// Render records as CSV with a header row.
pub fn to_csv<R: Row>(records: &[R]) -> Result<String, NodeVaultError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(R::HEADERS).map_err(csv_error)?;
    for record in records {
        writer.write_record(record.cells()).map_err(csv_error)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| NodeVaultError::Internal(format!("failed to finish CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| NodeVaultError::Internal(format!("CSV is not UTF-8: {e}")))
}

fn csv_error(e: csv::Error) -> NodeVaultError {
    NodeVaultError::Internal(format!("failed to write CSV: {e}"))
}

/// Write `records` to `path` as CSV. An empty collection writes nothing and
/// returns false.
pub async fn write_csv<R: Row>(path: &Path, records: &[R]) -> Result<bool, NodeVaultError> {
    if records.is_empty() {
        return Ok(false);
    }
    tokio::fs::write(path, to_csv(records)?)
        .await
        .map_err(NodeVaultError::storage)?;
    Ok(true)
}

/// Fetch records of kind `R`, filtered by `search` when given.
pub async fn fetch<R: Row>(
    vault: &VaultController,
    search: Option<&str>,
) -> Result<Vec<R>, NodeVaultError> {
    match search {
        Some(term) => vault.search::<R>(term).await,
        None => vault.records::<R>().await,
    }
}

/// Print records of kind `R`, or write them as CSV to `csv_out`.
pub async fn show<R: Row>(
    vault: &VaultController,
    search: Option<&str>,
    csv_out: Option<&Path>,
) -> Result<(), NodeVaultError> {
    let records = fetch::<R>(vault, search).await?;
    match csv_out {
        Some(path) => {
            if write_csv(path, &records).await? {
                println!("wrote {} {}(s) to {}", records.len(), R::KIND, path.display());
            } else {
                println!("{}", format!("no {}s to export", R::KIND).dimmed());
            }
        }
        None => print_records(&records),
    }
    Ok(())
}

/// Dispatch [`show`] on a runtime record kind.
pub async fn show_kind(
    vault: &VaultController,
    kind: RecordKind,
    search: Option<&str>,
    csv_out: Option<&Path>,
) -> Result<(), NodeVaultError> {
    match kind {
        RecordKind::Node => show::<Node>(vault, search, csv_out).await,
        RecordKind::Wallet => show::<Wallet>(vault, search, csv_out).await,
        RecordKind::Airdrop => show::<Airdrop>(vault, search, csv_out).await,
    }
}

/// Run `nodevault list`: unlock the stored vault and show one record kind.
pub async fn run_list(
    vault: &VaultController,
    kind: RecordKind,
    search: Option<&str>,
    csv_out: Option<&Path>,
) -> Result<(), NodeVaultError> {
    crate::backup::unlock_existing(vault).await?;
    let result = show_kind(vault, kind, search, csv_out).await;
    vault.lock().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airdrop(label: &str, tags: &[&str]) -> Airdrop {
        Airdrop {
            id: "a1".into(),
            label: label.into(),
            url: "https://example.org".into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            notes: String::new(),
        }
    }

    #[test]
    fn csv_has_header_and_omits_id() {
        let csv = to_csv(&[airdrop("drop", &["zk", "l2"])]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("label,url,tags,notes"));
        assert_eq!(lines.next(), Some("drop,https://example.org,\"zk, l2\","));
        assert!(!csv.contains("a1"));
    }

    #[test]
    fn csv_quotes_embedded_quotes() {
        let csv = to_csv(&[airdrop("say \"hi\"", &[])]).unwrap();
        assert!(csv.contains("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn empty_collection_is_header_only() {
        let csv = to_csv::<Wallet>(&[]).unwrap();
        assert_eq!(csv, "name,network,publicAddress,notes\n");
    }

    #[tokio::test]
    async fn empty_collection_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallets.csv");
        assert!(!write_csv::<Wallet>(&path, &[]).await.unwrap());
        assert!(!path.exists());

        let path = dir.path().join("airdrops.csv");
        assert!(write_csv(&path, &[airdrop("drop", &[])]).await.unwrap());
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("label,url"));
    }

    #[test]
    fn headers_match_cells() {
        let node = Node {
            id: "n".into(),
            name: "a".into(),
            network: "b".into(),
            node_id: "c".into(),
            public_address: "d".into(),
            notes: "e".into(),
        };
        assert_eq!(node.cells().len(), Node::HEADERS.len());
    }
}
