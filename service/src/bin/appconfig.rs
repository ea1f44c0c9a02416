//! Command-line access to the configuration store.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use appconfig_service::MASKED_PLACEHOLDER;
use appconfig_service::config::defaults::{description, is_secret};

#[derive(Parser)]
#[command(name = "appconfig", about = "Inspect and update runtime configuration")]
struct Cli {
    /// SQLite database file (defaults to $APPCONFIG_DATA_DIR/config.db)
    #[arg(long, env = "APPCONFIG_DB", global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seed missing default entries
    Init,
    /// Visible entries, secrets masked
    List,
    /// Print one entry's value
    Get {
        key: String,
        /// Print secret values instead of the placeholder
        #[arg(long)]
        reveal: bool,
    },
    /// Apply KEY=VALUE pairs as one batch update
    Set {
        #[arg(value_parser = parse_pair, required = true)]
        pairs: Vec<(String, String)>,
    },
    /// Assembled object-storage config
    Storage,
    /// Assembled directory-service config
    Directory,
    /// Which features are configured
    Status,
}

#[derive(Serialize)]
struct ListedEntry<'a> {
    key_name: &'a str,
    key_value: &'a str,
    description: &'static str,
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    Ok((key.to_string(), value.to_string()))
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    appconfig_service::load_dotenv();
    let cli = Cli::parse();
    let service = appconfig_service::init_foundation(cli.db.as_deref())?;

    match cli.command {
        Command::Init => {
            let ids = service.all_key_ids()?;
            tracing::info!(entries = ids.len(), "Configuration initialized");
        }
        Command::List => {
            let entries = service.visible_entries_masked()?;
            let listed: Vec<ListedEntry<'_>> = entries
                .iter()
                .map(|e| ListedEntry {
                    key_name: &e.key_name,
                    key_value: &e.key_value,
                    description: description(&e.key_name).unwrap_or_default(),
                })
                .collect();
            print_json(&listed)?;
        }
        Command::Get { key, reveal } => {
            let entry = service
                .lookup(&key)
                .with_context(|| format!("reading {key}"))?;
            if !reveal && is_secret(&key) && !entry.key_value.is_empty() {
                println!("{MASKED_PLACEHOLDER}");
            } else {
                println!("{}", entry.key_value);
            }
        }
        Command::Set { pairs } => {
            let proposed: HashMap<String, Option<String>> =
                pairs.into_iter().map(|(k, v)| (k, Some(v))).collect();
            let written = service.apply_batch_update(&proposed)?;
            println!("Updated {written} setting(s)");
        }
        Command::Storage => print_json(&service.object_storage_config()?)?,
        Command::Directory => print_json(&service.directory_config()?)?,
        Command::Status => print_json(&service.feature_status()?)?,
    }
    Ok(())
}
