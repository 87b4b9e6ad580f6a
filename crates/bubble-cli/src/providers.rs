//! # Providers Subcommand
//!
//! Manage the storage provider list at `<app_dir>/servers`.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::config::ToolsConfig;
use crate::LabelStores;

/// Arguments for the `bubble providers` subcommand.
#[derive(Args, Debug)]
pub struct ProvidersArgs {
    #[command(subcommand)]
    pub command: ProvidersCommand,
}

/// Provider list subcommands.
#[derive(Subcommand, Debug)]
pub enum ProvidersCommand {
    /// List all providers.
    List {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Add a provider.
    Add {
        /// Label, stored lower-case.
        label: String,
        /// Provider url, stored lower-case.
        url: String,
        /// Provider signing address, or a label resolving to one.
        id: String,
    },

    /// Remove a provider.
    Remove {
        /// Label to remove.
        label: String,
    },
}

/// Execute the providers subcommand.
pub fn run_providers(args: &ProvidersArgs, config: &ToolsConfig) -> Result<u8> {
    match &args.command {
        ProvidersCommand::List { json } => {
            let servers = config.servers().context("failed to load server list")?;
            if *json {
                crate::print_json(&servers.entries())?;
            } else if servers.entries().is_empty() {
                println!("no providers configured");
            } else {
                for entry in servers.entries() {
                    let id = entry
                        .id
                        .as_ref()
                        .map_or_else(|| "-".to_string(), ToString::to_string);
                    println!("{:<20} {:<44} {id}", entry.label, entry.url);
                }
            }
            Ok(0)
        }

        ProvidersCommand::Add { label, url, id } => {
            let stores = LabelStores::load(config)?;
            let id = stores.resolver().resolve_contract(id, "id")?;
            let mut servers = stores.servers;
            let entry = servers.add(label, url, id.as_str())?.clone();
            servers.save()?;
            println!("OK: added provider {} at {}", entry.label, entry.url);
            Ok(0)
        }

        ProvidersCommand::Remove { label } => {
            let mut servers = config.servers().context("failed to load server list")?;
            let entry = servers.remove(label)?;
            servers.save()?;
            println!("OK: removed provider {}", entry.label);
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_resolves_id_label() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolsConfig {
            app_dir: dir.path().to_path_buf(),
        };
        let mut book = config.address_book().unwrap();
        book.add("vault", "0x2222222222222222222222222222222222222222", None, false)
            .unwrap();
        book.save().unwrap();

        let add = ProvidersArgs {
            command: ProvidersCommand::Add {
                label: "Server1".to_string(),
                url: "https://Server1.com/path1/".to_string(),
                id: "vault".to_string(),
            },
        };
        assert_eq!(run_providers(&add, &config).unwrap(), 0);

        let servers = config.servers().unwrap();
        let entry = servers.get("server1").unwrap();
        assert_eq!(entry.url, "https://server1.com/path1/");
        assert_eq!(
            entry.id.as_ref().unwrap().as_str(),
            "0x2222222222222222222222222222222222222222"
        );
    }

    #[test]
    fn add_rejects_unresolvable_id() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolsConfig {
            app_dir: dir.path().to_path_buf(),
        };
        let add = ProvidersArgs {
            command: ProvidersCommand::Add {
                label: "s".to_string(),
                url: "https://s.com".to_string(),
                id: "nobody".to_string(),
            },
        };
        let err = run_providers(&add, &config).unwrap_err();
        assert!(format!("{err:#}").contains("`id` is invalid"));
    }

    #[test]
    fn remove_unknown_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolsConfig {
            app_dir: dir.path().to_path_buf(),
        };
        let remove = ProvidersArgs {
            command: ProvidersCommand::Remove {
                label: "missing".to_string(),
            },
        };
        assert!(run_providers(&remove, &config).is_err());
    }
}
