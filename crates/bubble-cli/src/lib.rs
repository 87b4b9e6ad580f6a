//! # bubble-cli — Command-Line Tool for Bubble Off-Chain Storage
//!
//! Provides the `bubble` command-line interface over the identifier,
//! signing-payload and registry crates.
//!
//! ## Subcommands
//!
//! - `bubble did` — Encode, decode and shorten `did:bubble:` identifiers.
//! - `bubble addresses` — Address book management.
//! - `bubble providers` — Storage provider list management.
//! - `bubble wallet` — Wallet key labels (public references only).
//! - `bubble hash` — Permission hashes, checksums, data hashes and packets.
//! - `bubble nft` — Mint invitation packets for Bubble NFT contracts.
//! - `bubble config` — Show the resolved configuration.
//!
//! Arguments naming a contract, file or server accept labels, DIDs, hex
//! and decimal literals, resolved through [`LabelResolver`]:
//!
//! ```bash
//! bubble did encode alice --provider server1 --file 10/notes.txt
//! bubble hash permission did:bubble:11EnrGHeqCd5UQ2jTW2Mo32o6a2GG 0x102
//! ```

pub mod addresses;
pub mod config;
pub mod config_cmd;
pub mod did;
pub mod hash;
pub mod nft;
pub mod providers;
pub mod wallet;

use anyhow::{Context, Result};
use bubble_registry::{AddressBook, LabelResolver, ServerList, WalletLabels};

use crate::config::ToolsConfig;

/// The three label stores, loaded once per command.
#[derive(Debug, Clone, Default)]
pub struct LabelStores {
    /// The address book.
    pub addresses: AddressBook,
    /// Wallet key references.
    pub wallet: WalletLabels,
    /// Storage providers.
    pub servers: ServerList,
}

impl LabelStores {
    /// Load all stores from the application directory.
    ///
    /// # Errors
    ///
    /// Fails if any store file is unreadable or malformed.
    pub fn load(config: &ToolsConfig) -> Result<Self> {
        Ok(Self {
            addresses: config.address_book().context("failed to load address book")?,
            wallet: config.wallet().context("failed to load wallet")?,
            servers: config.servers().context("failed to load server list")?,
        })
    }

    /// A resolver over these stores.
    pub fn resolver(&self) -> LabelResolver<'_> {
        LabelResolver::new(&self.addresses, &self.wallet, &self.servers)
    }
}

/// Print a value as pretty JSON on stdout.
///
/// # Errors
///
/// Fails if the value cannot be serialized.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
