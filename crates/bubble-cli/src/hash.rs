//! # Hash Subcommand
//!
//! Hashes used when talking to Bubble contracts and providers.
//!
//! ## Subcommands
//!
//! - `permission` — The `setPermissions` key for a file under a contract.
//! - `checksum` — EIP-55 form of an address.
//! - `data` — Keccak-256 of a UTF-8 string.
//! - `packet` — Packed encoding of typed values, and its hash.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use bubble_core::parse_any;
use bubble_crypto::{
    data_hash, encode_packed, keccak256_hex, parse_field, permission_hash_hex,
    to_checksum_address, PacketField,
};

use crate::config::ToolsConfig;
use crate::LabelStores;

/// Arguments for the `bubble hash` subcommand.
#[derive(Args, Debug)]
pub struct HashArgs {
    #[command(subcommand)]
    pub command: HashCommand,
}

/// Hash subcommands.
#[derive(Subcommand, Debug)]
pub enum HashCommand {
    /// Permission key for a file under a contract.
    Permission {
        /// Contract: address, label or DID. A DID may carry the file.
        contract: String,
        /// File id or `<dir>/<name>` path.
        file: Option<String>,
    },

    /// EIP-55 checksummed form of an address.
    Checksum {
        /// Address, label or literal.
        address: String,
    },

    /// Keccak-256 of a string.
    Data {
        /// The text to hash.
        text: String,
    },

    /// Packed encoding of `type:value` arguments.
    Packet {
        /// Fields such as `text:mint`, `address:0x…`, `uint32:3`, `hex32:0x…`.
        #[arg(required = true)]
        fields: Vec<String>,
    },
}

/// Execute the hash subcommand.
pub fn run_hash(args: &HashArgs, config: &ToolsConfig) -> Result<u8> {
    match &args.command {
        HashCommand::Permission { contract, file } => {
            let stores = LabelStores::load(config)?;
            println!("{}", permission(&stores, contract, file.as_deref())?);
            Ok(0)
        }

        HashCommand::Checksum { address } => {
            let stores = LabelStores::load(config)?;
            let address = stores.resolver().resolve_contract(address, "address")?;
            println!("{}", to_checksum_address(&address));
            Ok(0)
        }

        HashCommand::Data { text } => {
            println!("{}", data_hash(text));
            Ok(0)
        }

        HashCommand::Packet { fields } => {
            let (packet, hash) = packet(fields)?;
            println!("packet: {packet}");
            println!("hash:   {hash}");
            Ok(0)
        }
    }
}

/// Permission key for the resolved contract and file.
pub fn permission(stores: &LabelStores, contract: &str, file: Option<&str>) -> Result<String> {
    let resolver = stores.resolver();
    let address = resolver.resolve_contract(contract, "contract")?;
    let file = match file {
        Some(file) => resolver.resolve_file(file, "file")?,
        None => match parse_any(contract).ok().and_then(|id| id.file().cloned()) {
            Some(file) => file,
            None => bail!("`file` is missing"),
        },
    };
    Ok(permission_hash_hex(&address, &file))
}

/// Packed bytes and their hash, both as `0x` hex.
pub fn packet(args: &[String]) -> Result<(String, String)> {
    let fields = args
        .iter()
        .map(|arg| parse_field(arg).with_context(|| format!("invalid packet field {arg}")))
        .collect::<Result<Vec<PacketField>>>()?;
    let bytes = encode_packed(&fields)?;
    Ok((format!("0x{}", hex::encode(&bytes)), keccak256_hex(&bytes)))
}
