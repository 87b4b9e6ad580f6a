//! # Mint Invitations
//!
//! Signed invitations that let a third party mint a token from a Bubble NFT
//! contract. The contract owner signs a packed payload; the invitee submits
//! it with the signature to `mintWithInvite` or `mintNextWithInvite`.
//!
//! ## Packets
//!
//! ```text
//! mintWithInvite:     text ‖ address ‖ uint32 series ‖ uint128 tokenId ‖ uint256 expiry
//! mintNextWithInvite: text ‖ address ‖ uint32 series ‖ hex32 nonce    ‖ uint256 expiry
//! ```
//!
//! The signature covers `keccak256(packet)`. Key material never enters this
//! crate: signing goes through the [`Signer`] collaborator.
//!
//! ## Compact Form
//!
//! A [`SignedInvitation`] travels as base-58 of its JSON with short keys
//! `c`, `s`, `t` or `n`, `e` and `sig`.

use bubble_core::bytes::{base58_decode, base58_encode};
use bubble_core::Address;
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;
use crate::keccak::keccak256;
use crate::packet::{encode_packed, PacketField};

/// Default invitation lifetime when none is given.
pub const DEFAULT_EXPIRY: &str = "28d";

/// External signing key. Only the address and the sign operation are used.
pub trait Signer {
    /// The signer's public address.
    fn address(&self) -> &Address;

    /// Sign a 32-byte hash, returning the signature as hex.
    ///
    /// # Errors
    ///
    /// [`CryptoError::SigningFailed`] if the key store cannot sign.
    fn sign(&self, hash: &[u8; 32]) -> Result<String, CryptoError>;
}

/// Invitation to mint a specific token id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintInvitation {
    /// The NFT contract.
    pub contract: Address,
    /// Token series.
    pub series: u32,
    /// Token id within the series.
    pub token_id: u128,
    /// Expiry, seconds since the Unix epoch.
    pub expiry: u64,
}

impl MintInvitation {
    /// Contract method the packet authorises.
    pub const METHOD: &'static str = "mintWithInvite";

    /// Packet fields in contract order.
    pub fn fields(&self) -> Vec<PacketField> {
        vec![
            PacketField::text(Self::METHOD),
            PacketField::Address(self.contract.clone()),
            PacketField::uint32(self.series),
            PacketField::uint128(self.token_id),
            PacketField::uint256(u128::from(self.expiry)),
        ]
    }

    /// Packed payload.
    ///
    /// # Errors
    ///
    /// As [`encode_packed`].
    pub fn packet(&self) -> Result<Vec<u8>, CryptoError> {
        encode_packed(&self.fields())
    }

    /// Hash the owner signs.
    ///
    /// # Errors
    ///
    /// As [`encode_packed`].
    pub fn hash(&self) -> Result<[u8; 32], CryptoError> {
        self.packet().map(|p| keccak256(&p))
    }

    /// Sign with an external key.
    ///
    /// # Errors
    ///
    /// Packet errors, or [`CryptoError::SigningFailed`] from the signer.
    pub fn sign_with(&self, signer: &dyn Signer) -> Result<SignedInvitation, CryptoError> {
        let signature = signer.sign(&self.hash()?)?;
        Ok(SignedInvitation {
            contract: self.contract.clone(),
            series: self.series,
            token_id: Some(self.token_id),
            nonce: None,
            expiry: self.expiry,
            sig: with_hex_prefix(signature),
        })
    }
}

/// Invitation to mint the next token of a series, made single-use by a nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintNextInvitation {
    /// The NFT contract.
    pub contract: Address,
    /// Token series.
    pub series: u32,
    /// Single-use nonce, see [`invitation_nonce`].
    pub nonce: [u8; 32],
    /// Expiry, seconds since the Unix epoch.
    pub expiry: u64,
}

impl MintNextInvitation {
    /// Contract method the packet authorises.
    pub const METHOD: &'static str = "mintNextWithInvite";

    /// Packet fields in contract order.
    pub fn fields(&self) -> Vec<PacketField> {
        vec![
            PacketField::text(Self::METHOD),
            PacketField::Address(self.contract.clone()),
            PacketField::uint32(self.series),
            PacketField::fixed_bytes(&self.nonce),
            PacketField::uint256(u128::from(self.expiry)),
        ]
    }

    /// Packed payload.
    ///
    /// # Errors
    ///
    /// As [`encode_packed`].
    pub fn packet(&self) -> Result<Vec<u8>, CryptoError> {
        encode_packed(&self.fields())
    }

    /// Hash the owner signs.
    ///
    /// # Errors
    ///
    /// As [`encode_packed`].
    pub fn hash(&self) -> Result<[u8; 32], CryptoError> {
        self.packet().map(|p| keccak256(&p))
    }

    /// Sign with an external key.
    ///
    /// # Errors
    ///
    /// Packet errors, or [`CryptoError::SigningFailed`] from the signer.
    pub fn sign_with(&self, signer: &dyn Signer) -> Result<SignedInvitation, CryptoError> {
        let signature = signer.sign(&self.hash()?)?;
        Ok(SignedInvitation {
            contract: self.contract.clone(),
            series: self.series,
            token_id: None,
            nonce: Some(format!("0x{}", hex::encode(self.nonce))),
            expiry: self.expiry,
            sig: with_hex_prefix(signature),
        })
    }
}

/// A signed invitation as handed to the invitee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInvitation {
    /// The NFT contract.
    #[serde(rename = "c")]
    pub contract: Address,
    /// Token series.
    #[serde(rename = "s")]
    pub series: u32,
    /// Token id, for `mintWithInvite`.
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<u128>,
    /// Nonce as `0x` hex, for `mintNextWithInvite`.
    #[serde(rename = "n", default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    /// Expiry, seconds since the Unix epoch.
    #[serde(rename = "e")]
    pub expiry: u64,
    /// Owner signature as `0x` hex.
    pub sig: String,
}

impl SignedInvitation {
    /// Base-58 of the JSON form.
    ///
    /// # Errors
    ///
    /// [`CryptoError::Serialization`] if JSON encoding fails.
    pub fn to_compact(&self) -> Result<String, CryptoError> {
        let json = serde_json::to_vec(self)?;
        base58_encode(&json).ok_or_else(|| CryptoError::InvalidInvitation("empty".to_string()))
    }

    /// Inverse of [`SignedInvitation::to_compact`].
    ///
    /// # Errors
    ///
    /// [`CryptoError::InvalidInvitation`] for bad base-58,
    /// [`CryptoError::Serialization`] for bad JSON.
    pub fn from_compact(s: &str) -> Result<Self, CryptoError> {
        let json = base58_decode(s).map_err(|e| CryptoError::InvalidInvitation(e.to_string()))?;
        Ok(serde_json::from_slice(&json)?)
    }
}

fn with_hex_prefix(signature: String) -> String {
    if signature.starts_with("0x") {
        signature
    } else {
        format!("0x{signature}")
    }
}

/// Single-use nonce: `keccak256("<contract><timestamp_ms>nonce")`.
pub fn invitation_nonce(contract: &Address, timestamp_ms: u64) -> [u8; 32] {
    keccak256(format!("{contract}{timestamp_ms}nonce").as_bytes())
}

/// Parse a duration such as `12h`, `28d` or `2w3d4h` into seconds.
///
/// Units are `h`, `d` and `w`, case-insensitive. Components may repeat and
/// are summed.
///
/// # Errors
///
/// [`CryptoError::InvalidDuration`] for an empty string, a zero component,
/// a missing or unknown unit, or overflow.
pub fn parse_duration(s: &str) -> Result<u64, CryptoError> {
    let invalid = || CryptoError::InvalidDuration(s.to_string());
    let lower = s.to_ascii_lowercase();
    let mut rest = lower.as_str();
    let mut total: u64 = 0;
    if rest.is_empty() {
        return Err(invalid());
    }

    while !rest.is_empty() {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(invalid());
        }
        let value: u64 = rest[..digits].parse().map_err(|_| invalid())?;
        rest = &rest[digits..];

        let unit_len = rest.bytes().take_while(u8::is_ascii_alphabetic).count();
        let seconds_per_unit = match &rest[..unit_len] {
            "h" => 3_600,
            "d" => 86_400,
            "w" => 7 * 86_400,
            _ => return Err(invalid()),
        };
        rest = &rest[unit_len..];

        if value == 0 {
            return Err(invalid());
        }
        total = value
            .checked_mul(seconds_per_unit)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(invalid)?;
    }
    Ok(total)
}
