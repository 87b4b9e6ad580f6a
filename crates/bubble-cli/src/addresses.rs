//! # Addresses Subcommand
//!
//! Manage the address book at `<app_dir>/addresses`.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::config::ToolsConfig;

/// Arguments for the `bubble addresses` subcommand.
#[derive(Args, Debug)]
pub struct AddressesArgs {
    #[command(subcommand)]
    pub command: AddressesCommand,
}

/// Address book subcommands.
#[derive(Subcommand, Debug)]
pub enum AddressesCommand {
    /// List all entries.
    List {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Add a labelled address.
    Add {
        /// Label, stored lower-case.
        label: String,
        /// Hex address or Bubble DID.
        address: String,
        /// Optional note.
        memo: Option<String>,
        /// Store the address in lower case.
        #[arg(long)]
        lowercase: bool,
    },

    /// Remove a labelled address.
    Remove {
        /// Label to remove.
        label: String,
    },
}

/// Execute the addresses subcommand.
pub fn run_addresses(args: &AddressesArgs, config: &ToolsConfig) -> Result<u8> {
    let mut book = config.address_book().context("failed to load address book")?;
    match &args.command {
        AddressesCommand::List { json } => {
            if *json {
                crate::print_json(&book.entries())?;
            } else if book.entries().is_empty() {
                println!("address book is empty");
            } else {
                for entry in book.entries() {
                    match &entry.memo {
                        Some(memo) => println!("{:<20} {}  {memo}", entry.label, entry.address),
                        None => println!("{:<20} {}", entry.label, entry.address),
                    }
                }
            }
            Ok(0)
        }

        AddressesCommand::Add {
            label,
            address,
            memo,
            lowercase,
        } => {
            let entry = book.add(label, address, memo.clone(), *lowercase)?.clone();
            book.save()?;
            println!("OK: added {} = {}", entry.label, entry.address);
            Ok(0)
        }

        AddressesCommand::Remove { label } => {
            let entry = book.remove(label)?;
            book.save()?;
            println!("OK: removed {}", entry.label);
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &tempfile::TempDir) -> ToolsConfig {
        ToolsConfig {
            app_dir: dir.path().join("app"),
        }
    }

    #[test]
    fn add_persists_and_remove_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let add = AddressesArgs {
            command: AddressesCommand::Add {
                label: "Alice".to_string(),
                address: "0x0123456789ABCDEF0123456789abcdef01234567".to_string(),
                memo: Some("friend".to_string()),
                lowercase: true,
            },
        };
        assert_eq!(run_addresses(&add, &config).unwrap(), 0);

        let book = config.address_book().unwrap();
        let entry = book.get("alice").unwrap();
        assert_eq!(
            entry.address.as_str(),
            "0x0123456789abcdef0123456789abcdef01234567"
        );
        assert_eq!(entry.memo.as_deref(), Some("friend"));

        let remove = AddressesArgs {
            command: AddressesCommand::Remove {
                label: "ALICE".to_string(),
            },
        };
        assert_eq!(run_addresses(&remove, &config).unwrap(), 0);
        assert!(config.address_book().unwrap().entries().is_empty());
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let add = AddressesArgs {
            command: AddressesCommand::Add {
                label: "bob".to_string(),
                address: "did:bubble:11EnrGHeqCd5UQ2jTW2Mo32o6a2GG".to_string(),
                memo: None,
                lowercase: false,
            },
        };
        run_addresses(&add, &config).unwrap();
        assert!(run_addresses(&add, &config).is_err());
    }

    #[test]
    fn remove_unknown_label_fails() {
        let dir = tempfile::tempdir().unwrap();
        let remove = AddressesArgs {
            command: AddressesCommand::Remove {
                label: "nobody".to_string(),
            },
        };
        assert!(run_addresses(&remove, &config(&dir)).is_err());
    }
}
