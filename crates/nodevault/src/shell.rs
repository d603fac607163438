// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nodevault shell` command implementation.
//!
//! Interactive REPL over one vault session, with colored prompt and readline
//! history. Auto-lock keeps running between commands; an inactivity lock is
//! reported when the next command is entered.

use std::path::PathBuf;

use colored::Colorize;
use nodevault_config::NodeVaultConfig;
use nodevault_core::{Airdrop, Node, NodeVaultError, RecordKind, Wallet};
use nodevault_vault::VaultController;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::{backup, fields, records};

/// One parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Unlock,
    Lock,
    Save,
    List { kind: RecordKind, search: Option<String> },
    Csv { kind: RecordKind, path: PathBuf },
    Add { kind: RecordKind, args: Vec<String> },
    Set { kind: RecordKind, id: String, args: Vec<String> },
    Rm { kind: RecordKind, ids: Vec<String> },
    Prefs,
    Pref { args: Vec<String> },
    Export { path: Option<PathBuf> },
    Import { path: PathBuf },
    Status,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  unlock                         unlock (or create) the vault
  lock                           lock now; unsaved changes are discarded
  save                           encrypt and store the vault
  list <kind> [term]             list nodes, wallets or airdrops
  csv <kind> <file>              write one kind to a CSV file
  add <kind> key=value...        add a record
  set <kind> <id> key=value...   update a record
  rm <kind> <id>...              delete one or more records
  prefs                          show preferences
  pref key=value...              set language, theme or autoLock (minutes)
  export [file]                  write an encrypted backup
  import <file>                  replace vault contents from a backup
  status                         show lock state and storage location
  help                           show this help
  quit                           lock and exit

kinds: node, wallet, airdrop. Quote values containing spaces: name=\"my node\"";

/// Split a line into words with POSIX shell quoting rules.
pub fn tokenize(line: &str) -> Result<Vec<String>, NodeVaultError> {
    shell_words::split(line).map_err(|e| NodeVaultError::Validation(e.to_string()))
}

fn parse_kind(token: Option<&String>) -> Result<RecordKind, NodeVaultError> {
    let token = token.ok_or_else(|| {
        NodeVaultError::Validation("missing kind (node, wallet, airdrop)".to_string())
    })?;
    let singular = token.strip_suffix('s').unwrap_or(token);
    singular.parse::<RecordKind>().map_err(|_| {
        NodeVaultError::Validation(format!("unknown kind `{token}` (node, wallet, airdrop)"))
    })
}

fn usage(text: &str) -> NodeVaultError {
    NodeVaultError::Validation(format!("usage: {text}"))
}

/// Parse one input line. Returns `None` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<Command>, NodeVaultError> {
    let tokens = tokenize(line)?;
    let Some((head, rest)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match head.trim_start_matches('/').to_lowercase().as_str() {
        "unlock" => Command::Unlock,
        "lock" => Command::Lock,
        "save" => Command::Save,
        "list" | "ls" => Command::List {
            kind: parse_kind(rest.first())?,
            search: (rest.len() > 1).then(|| rest[1..].join(" ")),
        },
        "csv" => match rest {
            [_, path] => Command::Csv {
                kind: parse_kind(rest.first())?,
                path: PathBuf::from(path),
            },
            _ => return Err(usage("csv <kind> <file>")),
        },
        "add" => {
            if rest.len() < 2 {
                return Err(usage("add <kind> key=value..."));
            }
            Command::Add {
                kind: parse_kind(rest.first())?,
                args: rest[1..].to_vec(),
            }
        }
        "set" | "edit" => {
            if rest.len() < 3 {
                return Err(usage("set <kind> <id> key=value..."));
            }
            Command::Set {
                kind: parse_kind(rest.first())?,
                id: rest[1].clone(),
                args: rest[2..].to_vec(),
            }
        }
        "rm" | "delete" => {
            if rest.len() < 2 {
                return Err(usage("rm <kind> <id>..."));
            }
            Command::Rm {
                kind: parse_kind(rest.first())?,
                ids: rest[1..].to_vec(),
            }
        }
        "prefs" => Command::Prefs,
        "pref" => {
            if rest.is_empty() {
                return Err(usage("pref key=value..."));
            }
            Command::Pref {
                args: rest.to_vec(),
            }
        }
        "export" => match rest {
            [] => Command::Export { path: None },
            [path] => Command::Export {
                path: Some(PathBuf::from(path)),
            },
            _ => return Err(usage("export [file]")),
        },
        "import" => match rest {
            [path] => Command::Import {
                path: PathBuf::from(path),
            },
            _ => return Err(usage("import <file>")),
        },
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(NodeVaultError::Validation(format!(
                "unknown command `{other}`; type `help`"
            )));
        }
    };
    Ok(Some(command))
}

struct Shell<'a> {
    config: &'a NodeVaultConfig,
    vault: VaultController,
    was_unlocked: bool,
}

impl Shell<'_> {
    /// Execute one command. Returns false when the shell should exit.
    async fn execute(&self, command: Command) -> Result<bool, NodeVaultError> {
        let vault = &self.vault;
        match command {
            Command::Unlock => {
                let created = backup::unlock_or_create(vault).await?;
                if created {
                    println!("{}", "new vault created; `save` to store it".green());
                } else {
                    println!("{}", "vault unlocked".green());
                }
            }
            Command::Lock => {
                if vault.lock().await {
                    println!("vault locked");
                } else {
                    println!("vault is already locked");
                }
            }
            Command::Save => {
                vault.save().await?;
                println!("{}", "vault saved".green());
            }
            Command::List { kind, search } => {
                records::show_kind(vault, kind, search.as_deref(), None).await?;
            }
            Command::Csv { kind, path } => {
                records::show_kind(vault, kind, None, Some(&path)).await?;
            }
            Command::Add { kind, args } => {
                let fields = fields::parse_fields(&args)?;
                let id = match kind {
                    RecordKind::Node => vault.add::<Node>(fields::node_draft(fields)?).await?,
                    RecordKind::Wallet => vault.add::<Wallet>(fields::wallet_draft(fields)?).await?,
                    RecordKind::Airdrop => {
                        vault.add::<Airdrop>(fields::airdrop_draft(fields)?).await?
                    }
                };
                println!("added {kind} {}", id.cyan());
            }
            Command::Set { kind, id, args } => {
                let fields = fields::parse_fields(&args)?;
                match kind {
                    RecordKind::Node => {
                        vault.update::<Node>(&id, fields::node_patch(fields)?).await?
                    }
                    RecordKind::Wallet => {
                        vault.update::<Wallet>(&id, fields::wallet_patch(fields)?).await?
                    }
                    RecordKind::Airdrop => {
                        vault.update::<Airdrop>(&id, fields::airdrop_patch(fields)?).await?
                    }
                }
                println!("updated {kind} {}", id.cyan());
            }
            Command::Rm { kind, ids } => {
                if let [id] = ids.as_slice() {
                    match kind {
                        RecordKind::Node => vault.delete::<Node>(id).await?,
                        RecordKind::Wallet => vault.delete::<Wallet>(id).await?,
                        RecordKind::Airdrop => vault.delete::<Airdrop>(id).await?,
                    }
                    println!("deleted {kind} {}", id.cyan());
                } else {
                    let removed = match kind {
                        RecordKind::Node => vault.delete_many::<Node>(&ids).await?,
                        RecordKind::Wallet => vault.delete_many::<Wallet>(&ids).await?,
                        RecordKind::Airdrop => vault.delete_many::<Airdrop>(&ids).await?,
                    };
                    println!("deleted {removed} of {} {kind}(s)", ids.len());
                }
            }
            Command::Prefs => {
                let prefs = vault.preferences().await;
                println!("  language: {}", prefs.language);
                println!("  theme:    {}", prefs.theme);
                println!("  autoLock: {} min", prefs.auto_lock_minutes);
            }
            Command::Pref { args } => {
                let patch = fields::preferences_patch(fields::parse_fields(&args)?)?;
                vault.update_preferences(patch).await?;
                println!("preferences updated");
            }
            Command::Export { path } => {
                let path = path.unwrap_or_else(|| PathBuf::from(&self.config.export.default_file));
                let envelope = vault.export().await?;
                backup::write_backup(&path, &envelope).await?;
                println!("exported vault to {}", path.display());
            }
            Command::Import { path } => {
                if vault.is_locked().await {
                    return Err(NodeVaultError::Locked);
                }
                let text = backup::read_backup(&path).await?;
                vault
                    .import(&text, nodevault_vault::get_import_password()?)
                    .await?;
                println!("{}", "vault contents replaced; `save` to keep them".green());
            }
            Command::Status => {
                let state = if vault.is_locked().await {
                    "locked".yellow()
                } else {
                    "unlocked".green()
                };
                println!("  vault:    {state}");
                println!("  saved:    {}", vault.has_stored_vault().await?);
                println!("  database: {}", self.config.storage.database_path);
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }
}

/// Runs the `nodevault shell` interactive REPL.
pub async fn run_shell(
    config: &NodeVaultConfig,
    vault: VaultController,
) -> Result<(), NodeVaultError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| NodeVaultError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "nodevault shell".bold().green());
    println!("Type {} for commands, {} to exit.\n", "help".yellow(), "quit".yellow());

    let mut shell = Shell {
        config,
        vault,
        was_unlocked: false,
    };

    loop {
        let prompt = if shell.vault.is_locked().await {
            format!("{}> ", "nodevault".green())
        } else {
            format!("{}{}> ", "nodevault".green(), "*".yellow())
        };

        match rl.readline(&prompt) {
            Ok(line) => {
                if shell.was_unlocked && shell.vault.is_locked().await {
                    println!(
                        "{}",
                        "vault was locked after inactivity; unsaved changes were discarded"
                            .yellow()
                    );
                    shell.was_unlocked = false;
                }
                shell.vault.touch().await;

                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        eprintln!("{}: {e}", "error".red());
                        continue;
                    }
                };
                let _ = rl.add_history_entry(line.as_str());

                debug!(?command, "shell command");
                match shell.execute(command).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
                shell.was_unlocked = !shell.vault.is_locked().await;
            }
            // Ctrl+C / Ctrl+D
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    shell.vault.lock().await;
    println!("{}", "goodbye".dimmed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn tokenize_handles_quotes_and_escapes() {
        assert_eq!(
            tokenize(r#"add node name="my node" notes=a\ b"#).unwrap(),
            vec!["add", "node", "name=my node", "notes=a b"]
        );
        assert_eq!(tokenize("  ").unwrap(), Vec::<String>::new());
        assert_eq!(tokenize(r#"x """#).unwrap(), vec!["x", ""]);
        assert!(tokenize(r#"add "open"#).is_err());
        assert_eq!(
            tokenize("add airdrop 'label=single quoted'").unwrap(),
            vec!["add", "airdrop", "label=single quoted"]
        );
    }

    #[test]
    fn blank_line_is_none() {
        assert!(parse_command("   ").unwrap().is_none());
    }

    #[test]
    fn kinds_accept_plural_and_case() {
        assert_eq!(
            parse("list Wallets"),
            Command::List {
                kind: RecordKind::Wallet,
                search: None
            }
        );
        assert_eq!(
            parse("ls airdrop zk season"),
            Command::List {
                kind: RecordKind::Airdrop,
                search: Some("zk season".to_string())
            }
        );
        assert!(parse_command("list coins").is_err());
    }

    #[test]
    fn add_set_rm() {
        assert_eq!(
            parse("add node name=a network=b"),
            Command::Add {
                kind: RecordKind::Node,
                args: vec!["name=a".into(), "network=b".into()]
            }
        );
        assert_eq!(
            parse("set wallet w1 notes=x"),
            Command::Set {
                kind: RecordKind::Wallet,
                id: "w1".into(),
                args: vec!["notes=x".into()]
            }
        );
        assert_eq!(
            parse("rm airdrop a1 a2"),
            Command::Rm {
                kind: RecordKind::Airdrop,
                ids: vec!["a1".into(), "a2".into()]
            }
        );
        assert!(parse_command("add node").is_err());
        assert!(parse_command("set node n1").is_err());
        assert!(parse_command("rm node").is_err());
    }

    #[test]
    fn export_import_paths() {
        assert_eq!(parse("export"), Command::Export { path: None });
        assert_eq!(
            parse("export out.nv.enc"),
            Command::Export {
                path: Some(PathBuf::from("out.nv.enc"))
            }
        );
        assert_eq!(
            parse("import \"my backup.nv.enc\""),
            Command::Import {
                path: PathBuf::from("my backup.nv.enc")
            }
        );
        assert!(parse_command("import").is_err());
        assert!(parse_command("export a b").is_err());
    }

    #[test]
    fn quit_aliases() {
        for line in ["quit", "exit", "/quit", "/exit", "QUIT"] {
            assert_eq!(parse(line), Command::Quit, "{line}");
        }
    }

    #[test]
    fn unknown_command_suggests_help() {
        let err = parse_command("frobnicate").unwrap_err();
        assert!(err.to_string().contains("help"));
    }
}
