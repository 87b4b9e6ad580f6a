//! # NFT Subcommand
//!
//! Mint invitations for Bubble NFT contracts.
//!
//! Signing happens outside this tool. A first run prints the packet and
//! the hash to sign, together with the expiry (and nonce); a second run
//! with the same `--expires-at` (and `--nonce`) plus `--signature` prints
//! the compact invitation to hand to the invitee.
//!
//! ```bash
//! bubble nft mint-invite mynft 3 1 --expiry 7d
//! bubble nft mint-invite mynft 3 1 --expires-at 1651771005 --signature 0x…
//! ```

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};

use bubble_core::Address;
use bubble_crypto::{
    invitation_nonce, parse_duration, CryptoError, MintInvitation, MintNextInvitation,
    SignedInvitation, Signer, DEFAULT_EXPIRY,
};

use crate::config::ToolsConfig;
use crate::LabelStores;

/// Arguments for the `bubble nft` subcommand.
#[derive(Args, Debug)]
pub struct NftArgs {
    #[command(subcommand)]
    pub command: NftCommand,
}

/// NFT subcommands.
#[derive(Subcommand, Debug)]
pub enum NftCommand {
    /// Invitation to mint a specific token.
    MintInvite {
        /// NFT contract: address, label or DID.
        contract: String,
        /// Token series.
        series: u32,
        /// Token id.
        token_id: u128,
        #[command(flatten)]
        timing: InviteTiming,
        /// Owner signature over the printed hash.
        #[arg(long)]
        signature: Option<String>,
    },

    /// Single-use invitation to mint the next token of a series.
    MintNextInvite {
        /// NFT contract: address, label or DID.
        contract: String,
        /// Token series.
        series: u32,
        #[command(flatten)]
        timing: InviteTiming,
        /// Nonce from an earlier run, as `0x` hex.
        #[arg(long)]
        nonce: Option<String>,
        /// Owner signature over the printed hash.
        #[arg(long)]
        signature: Option<String>,
    },
}

/// Invitation lifetime options.
#[derive(Args, Debug, Clone)]
pub struct InviteTiming {
    /// Lifetime from now, e.g. `12h`, `28d`, `2w`.
    #[arg(long, default_value = DEFAULT_EXPIRY)]
    pub expiry: String,
    /// Absolute expiry in Unix seconds. Overrides `--expiry`.
    #[arg(long)]
    pub expires_at: Option<u64>,
}

impl InviteTiming {
    /// Expiry in Unix seconds relative to `now`.
    pub fn expiry_at(&self, now: u64) -> Result<u64> {
        if let Some(at) = self.expires_at {
            return Ok(at);
        }
        let lifetime = parse_duration(&self.expiry)?;
        now.checked_add(lifetime)
            .with_context(|| format!("expiry {} is too far in the future", self.expiry))
    }
}

/// A signature produced outside the tool, replayed as a [`Signer`].
pub struct PresignedSigner {
    address: Address,
    signature: String,
}

impl PresignedSigner {
    /// Signer for `address` that returns `signature`.
    pub fn new(address: Address, signature: &str) -> Self {
        Self {
            address,
            signature: signature.trim().to_string(),
        }
    }
}

impl Signer for PresignedSigner {
    fn address(&self) -> &Address {
        &self.address
    }

    fn sign(&self, _hash: &[u8; 32]) -> Result<String, CryptoError> {
        let digits = self.signature.strip_prefix("0x").unwrap_or(&self.signature);
        if digits.is_empty() || hex::decode(digits).is_err() {
            return Err(CryptoError::SigningFailed(format!(
                "signature is not hex: {}",
                self.signature
            )));
        }
        Ok(self.signature.clone())
    }
}

/// Execute the nft subcommand.
pub fn run_nft(args: &NftArgs, config: &ToolsConfig) -> Result<u8> {
    let stores = LabelStores::load(config)?;
    let now = Utc::now();
    let now_secs = u64::try_from(now.timestamp()).context("system clock is before 1970")?;
    let now_ms = u64::try_from(now.timestamp_millis()).context("system clock is before 1970")?;

    match &args.command {
        NftCommand::MintInvite {
            contract,
            series,
            token_id,
            timing,
            signature,
        } => {
            let invite = MintInvitation {
                contract: stores.resolver().resolve_contract(contract, "contract")?,
                series: *series,
                token_id: *token_id,
                expiry: timing.expiry_at(now_secs)?,
            };
            println!("packet: 0x{}", hex::encode(invite.packet()?));
            println!("hash:   0x{}", hex::encode(invite.hash()?));
            println!("expiry: {}", invite.expiry);
            if let Some(signature) = signature {
                let signer = PresignedSigner::new(invite.contract.clone(), signature);
                print_invitation(&invite.sign_with(&signer)?)?;
            }
            Ok(0)
        }

        NftCommand::MintNextInvite {
            contract,
            series,
            timing,
            nonce,
            signature,
        } => {
            let contract = stores.resolver().resolve_contract(contract, "contract")?;
            let nonce = match nonce {
                Some(nonce) => parse_nonce(nonce)?,
                None => invitation_nonce(&contract, now_ms),
            };
            let invite = MintNextInvitation {
                contract,
                series: *series,
                nonce,
                expiry: timing.expiry_at(now_secs)?,
            };
            println!("packet: 0x{}", hex::encode(invite.packet()?));
            println!("hash:   0x{}", hex::encode(invite.hash()?));
            println!("expiry: {}", invite.expiry);
            println!("nonce:  0x{}", hex::encode(invite.nonce));
            if let Some(signature) = signature {
                let signer = PresignedSigner::new(invite.contract.clone(), signature);
                print_invitation(&invite.sign_with(&signer)?)?;
            }
            Ok(0)
        }
    }
}

fn print_invitation(signed: &SignedInvitation) -> Result<()> {
    println!("invite: {}", signed.to_compact()?);
    Ok(())
}

/// Parse a 32-byte `0x` hex nonce.
pub fn parse_nonce(s: &str) -> Result<[u8; 32]> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits).with_context(|| format!("nonce is not hex: {s}"))?;
    match <[u8; 32]>::try_from(bytes.as_slice()) {
        Ok(nonce) => Ok(nonce),
        Err(_) => bail!("nonce must be 32 bytes, got {}", bytes.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NFT: &str = "0xd9145cce52d386f254917e481eb44e9943f39138";

    fn timing(expiry: &str, expires_at: Option<u64>) -> InviteTiming {
        InviteTiming {
            expiry: expiry.to_string(),
            expires_at,
        }
    }

    #[test]
    fn expiry_relative_and_absolute() {
        assert_eq!(timing("1d", None).expiry_at(100).unwrap(), 100 + 86_400);
        assert_eq!(timing("1d", Some(5)).expiry_at(100).unwrap(), 5);
        assert!(timing("0d", None).expiry_at(100).is_err());
        assert!(timing("1d", None).expiry_at(u64::MAX).is_err());
    }

    #[test]
    fn presigned_signer_checks_hex() {
        let address = Address::parse(NFT).unwrap();
        let ok = PresignedSigner::new(address.clone(), " 0xabcd ");
        assert_eq!(ok.sign(&[0u8; 32]).unwrap(), "0xabcd");
        let bad = PresignedSigner::new(address, "not-a-signature");
        assert!(matches!(
            bad.sign(&[0u8; 32]),
            Err(CryptoError::SigningFailed(_))
        ));
    }

    #[test]
    fn presigned_invitation_round_trips() {
        let invite = MintInvitation {
            contract: Address::parse(NFT).unwrap(),
            series: 3,
            token_id: 1,
            expiry: 0x6274_067d,
        };
        let signer = PresignedSigner::new(invite.contract.clone(), "abcd");
        let signed = invite.sign_with(&signer).unwrap();
        assert_eq!(signed.sig, "0xabcd");
        let compact = signed.to_compact().unwrap();
        assert_eq!(SignedInvitation::from_compact(&compact).unwrap(), signed);
    }

    #[test]
    fn nonce_parsing() {
        let nonce = format!("0x{}", "ab".repeat(32));
        assert_eq!(parse_nonce(&nonce).unwrap(), [0xab; 32]);
        assert!(parse_nonce("0xabcd").is_err());
        assert!(parse_nonce("0xzz").is_err());
    }

    #[test]
    fn run_with_fixed_timing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ToolsConfig {
            app_dir: dir.path().to_path_buf(),
        };
        let args = NftArgs {
            command: NftCommand::MintNextInvite {
                contract: NFT.to_string(),
                series: 7,
                timing: timing(DEFAULT_EXPIRY, Some(1)),
                nonce: Some(format!("0x{}", "01".repeat(32))),
                signature: Some("0x1234".to_string()),
            },
        };
        assert_eq!(run_nft(&args, &config).unwrap(), 0);

        let unknown = NftArgs {
            command: NftCommand::MintInvite {
                contract: "mynft".to_string(),
                series: 1,
                token_id: 1,
                timing: timing(DEFAULT_EXPIRY, None),
                signature: None,
            },
        };
        assert!(run_nft(&unknown, &config).is_err());
    }
}
