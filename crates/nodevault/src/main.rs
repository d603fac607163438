// SPDX-FileCopyrightText: 2026 NodeVault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! NodeVault - an encrypted local vault for node, wallet, and airdrop records.
//!
//! This is the binary entry point.

mod backup;
mod fields;
mod records;
mod shell;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use nodevault_config::NodeVaultConfig;
use nodevault_core::{NodeVaultError, RecordKind};
use nodevault_storage::sqlite::SqliteStore;
use nodevault_vault::VaultController;

/// NodeVault - an encrypted local vault for node, wallet, and airdrop records.
#[derive(Parser, Debug)]
#[command(name = "nodevault", version, about, long_about = None)]
struct Cli {
    /// Path to a config file, replacing the default search locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive vault session.
    Shell,
    /// Write an encrypted backup of the stored vault.
    Export {
        /// Backup file to write (defaults to `export.default_file`).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the vault contents from an encrypted backup.
    Import {
        /// Backup file to read.
        file: PathBuf,
    },
    /// Print the records of one kind.
    List {
        /// Record kind: node, wallet or airdrop.
        #[arg(value_parser = parse_kind_arg)]
        kind: RecordKind,
        /// Only show records matching this term (case-insensitive).
        #[arg(long)]
        search: Option<String>,
        /// Write CSV to this file instead of printing.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Show where the vault is stored and whether it exists.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
}

fn parse_kind_arg(s: &str) -> Result<RecordKind, String> {
    let singular = s.strip_suffix('s').unwrap_or(s);
    singular
        .parse()
        .map_err(|_| format!("unknown kind `{s}` (node, wallet, airdrop)"))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => nodevault_config::load_and_validate_path(path),
        None => nodevault_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            nodevault_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    let Some(command) = cli.command else {
        println!("nodevault: use --help for available commands");
        return;
    };

    if let Err(e) = run(command, &config).await {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &NodeVaultConfig) -> Result<(), NodeVaultError> {
    let store = SqliteStore::open(&config.storage.database_path).await?;
    let vault = VaultController::from_config(Arc::new(store), &config.vault);

    match command {
        Commands::Shell => shell::run_shell(config, vault).await,
        Commands::Export { output } => {
            let output = output.unwrap_or_else(|| PathBuf::from(&config.export.default_file));
            backup::run_export(&vault, &output).await
        }
        Commands::Import { file } => backup::run_import(&vault, &file).await,
        Commands::List { kind, search, csv } => {
            records::run_list(&vault, kind, search.as_deref(), csv.as_deref()).await
        }
        Commands::Status { json, plain } => status::run_status(config, &vault, json, plain).await,
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
///
/// Logs go to stderr so they never mix with command output.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nodevault={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
