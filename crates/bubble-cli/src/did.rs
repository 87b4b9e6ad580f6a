//! # DID Subcommand
//!
//! Conversions between contract addresses, Bubble URLs and `did:bubble:`
//! identifiers.
//!
//! ## Subcommands
//!
//! - `encode` — Build a DID from a contract, optional server and file.
//! - `decode` — Show the parts of a DID or Bubble URL.
//! - `to-address` — Print the contract address of a DID.
//! - `from-address` — Print the plain DID of an address.
//! - `short` — Print the short form of a DID.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use bubble_core::{parse_any, ContentIdentifier};

use crate::config::ToolsConfig;
use crate::LabelStores;

/// Arguments for the `bubble did` subcommand.
#[derive(Args, Debug)]
pub struct DidArgs {
    #[command(subcommand)]
    pub command: DidCommand,
}

/// DID subcommands.
#[derive(Subcommand, Debug)]
pub enum DidCommand {
    /// Build a DID from a contract and optional server and file.
    Encode {
        /// Contract: address, label, DID or literal.
        contract: String,
        /// Storage provider: server label, or url with an `id` parameter.
        #[arg(long)]
        provider: Option<String>,
        /// File id or `<dir>/<name>` path.
        #[arg(long)]
        file: Option<String>,
        /// Print the `bubble:` URL form instead of the DID.
        #[arg(long)]
        url: bool,
    },

    /// Show the parts of a DID or Bubble URL.
    Decode {
        /// The DID or Bubble URL.
        did: String,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the contract address of a DID.
    ToAddress {
        /// The DID or Bubble URL.
        did: String,
    },

    /// Print the plain DID for an address.
    FromAddress {
        /// Address, label or literal.
        address: String,
    },

    /// Print the short form of a DID (no vault, default file omitted).
    Short {
        /// The DID or Bubble URL.
        did: String,
    },
}

/// Execute the did subcommand.
pub fn run_did(args: &DidArgs, config: &ToolsConfig) -> Result<u8> {
    match &args.command {
        DidCommand::Encode {
            contract,
            provider,
            file,
            url,
        } => {
            let stores = LabelStores::load(config)?;
            let id = build_identifier(&stores, contract, provider.as_deref(), file.as_deref())?;
            println!("{}", if *url { id.to_bubble_url() } else { id.to_did() });
            Ok(0)
        }

        DidCommand::Decode { did, json } => {
            let chain = config.chain_provider()?.chain();
            let id = parse_any(did)
                .with_context(|| format!("cannot decode {did}"))?
                .with_chain(chain);
            if *json {
                crate::print_json(&id)?;
            } else {
                print!("{}", describe(&id));
            }
            Ok(0)
        }

        DidCommand::ToAddress { did } => {
            let id = parse_any(did).with_context(|| format!("cannot decode {did}"))?;
            println!("{}", id.contract());
            Ok(0)
        }

        DidCommand::FromAddress { address } => {
            let stores = LabelStores::load(config)?;
            let contract = stores.resolver().resolve_contract(address, "address")?;
            println!("{}", ContentIdentifier::new(contract).to_did());
            Ok(0)
        }

        DidCommand::Short { did } => {
            let id = parse_any(did).with_context(|| format!("cannot decode {did}"))?;
            println!("{}", id.to_short_did());
            Ok(0)
        }
    }
}

/// Resolve user arguments into a content identifier.
pub fn build_identifier(
    stores: &LabelStores,
    contract: &str,
    provider: Option<&str>,
    file: Option<&str>,
) -> Result<ContentIdentifier> {
    let resolver = stores.resolver();
    let mut id = ContentIdentifier::new(resolver.resolve_contract(contract, "contract")?);
    if let Some(provider) = provider {
        let provider = resolver
            .resolve_server(provider, "provider")?
            .to_provider()
            .context("provider cannot be embedded in a DID")?;
        id = id.with_provider(provider);
    }
    if let Some(file) = file {
        id = id.with_file(resolver.resolve_file(file, "file")?);
    }
    Ok(id)
}

fn describe(id: &ContentIdentifier) -> String {
    let none = "-".to_string();
    let mut out = String::new();
    out.push_str(&format!("address:    {}\n", id.contract()));
    out.push_str(&format!(
        "chain:      {}\n",
        id.chain().map_or_else(|| none.clone(), ToString::to_string)
    ));
    out.push_str(&format!(
        "vault url:  {}\n",
        id.provider().map_or_else(|| none.clone(), |p| p.url().to_string())
    ));
    out.push_str(&format!(
        "vault id:   {}\n",
        id.provider().map_or_else(|| none.clone(), |p| p.id().to_string())
    ));
    out.push_str(&format!(
        "vault file: {}\n",
        id.file().map_or(none, ToString::to_string)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bubble_registry::{AddressBook, ServerList, WalletLabels};

    fn stores() -> LabelStores {
        let mut addresses = AddressBook::new();
        addresses
            .add("alice", "0x0123456789abcdef0123456789abcdef01234567", None, false)
            .unwrap();
        let mut servers = ServerList::new();
        servers
            .add(
                "server1",
                "https://server1.com/path1/",
                "0x0123456789abcdef0123456789abcdef01234567",
            )
            .unwrap();
        LabelStores {
            addresses,
            wallet: WalletLabels::new(),
            servers,
        }
    }

    #[test]
    fn build_identifier_from_labels() {
        let id = build_identifier(&stores(), "alice", Some("server1"), Some("1")).unwrap();
        assert_eq!(
            id.to_did(),
            "did:bubble:11vKkZ3XHF1D98QwaUTYfKUuwdB4\
             ?vault=KmhyenYESVyoEEv41iBEypF8TAHW7TCYmoDHBxFNq7KPxRM42tS6gs4YiB6rBonDDJ2BXDSwueNFAzKughmf9mVoEe\
             &file=11111111111111111112"
        );
    }

    #[test]
    fn build_identifier_reports_field() {
        let err = build_identifier(&stores(), "nobody", None, None).unwrap_err();
        assert!(format!("{err:#}").contains("`contract` is invalid"));
        let err = build_identifier(&stores(), "alice", Some("unknown"), None).unwrap_err();
        assert!(format!("{err:#}").contains("`provider` is invalid"));
    }

    #[test]
    fn describe_lists_all_parts() {
        let id = build_identifier(&stores(), "alice", Some("server1"), None).unwrap();
        let text = describe(&id);
        assert!(text.contains("address:    0x0123456789abcdef0123456789abcdef01234567"));
        assert!(text.contains("vault url:  https://server1.com/path1/"));
        assert!(text.contains("vault file: -"));
    }

    #[test]
    fn decode_and_to_address_commands() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolsConfig {
            app_dir: dir.path().to_path_buf(),
        };
        let decode = DidArgs {
            command: DidCommand::Decode {
                did: "did:bubble:11EnrGHeqCd5UQ2jTW2Mo32o6a2GG".to_string(),
                json: true,
            },
        };
        assert_eq!(run_did(&decode, &config).unwrap(), 0);
        let bad = DidArgs {
            command: DidCommand::ToAddress {
                did: "did:web:example.com".to_string(),
            },
        };
        assert!(run_did(&bad, &config).is_err());
    }
}
