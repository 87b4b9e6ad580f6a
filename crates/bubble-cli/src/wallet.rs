//! # Wallet Subcommand
//!
//! Manage wallet key labels at `<app_dir>/wallet`. Only public references
//! are stored; private keys stay in the external key store.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::config::ToolsConfig;

/// Arguments for the `bubble wallet` subcommand.
#[derive(Args, Debug)]
pub struct WalletArgs {
    #[command(subcommand)]
    pub command: WalletCommand,
}

/// Wallet subcommands.
#[derive(Subcommand, Debug)]
pub enum WalletCommand {
    /// List key labels and addresses.
    List {
        /// Include the public key.
        #[arg(long)]
        public_key: bool,
    },

    /// Record a key reference under a label.
    Import {
        /// Key label.
        label: String,
        /// The key's address.
        address: String,
        /// Uncompressed public key as hex.
        #[arg(long)]
        public_key: Option<String>,
    },

    /// Forget a key reference.
    Remove {
        /// Key label.
        label: String,
    },
}

/// Execute the wallet subcommand.
pub fn run_wallet(args: &WalletArgs, config: &ToolsConfig) -> Result<u8> {
    let mut wallet = config.wallet().context("failed to load wallet")?;
    match &args.command {
        WalletCommand::List { public_key } => {
            if wallet.keys().is_empty() {
                println!("wallet has no keys");
            }
            for key in wallet.keys() {
                match (&key.public_key, *public_key) {
                    (Some(pk), true) => println!("{:<24} {}  {pk}", key.label, key.address),
                    _ => println!("{:<24} {}", key.label, key.address),
                }
            }
            Ok(0)
        }

        WalletCommand::Import {
            label,
            address,
            public_key,
        } => {
            let key = wallet.import(label, address, public_key.clone())?.clone();
            wallet.save()?;
            println!("OK: imported {} ({})", key.label, key.address);
            Ok(0)
        }

        WalletCommand::Remove { label } => {
            let key = wallet.remove(label)?;
            wallet.save()?;
            println!("OK: removed {}", key.label);
            Ok(0)
        }
    }
}
