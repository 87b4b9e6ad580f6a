//! # bubble-crypto — Signing Payloads for Bubble Tools
//!
//! This crate builds the byte-exact payloads that Bubble smart contracts
//! verify:
//!
//! - **Packed encoding** of typed fields, matching Solidity's
//!   `abi.encodePacked`.
//! - **Keccak-256** hashing, the Ethereum variant.
//! - **Permission hashes** keying a file's access rights in a storage contract.
//! - **EIP-55** checksum casing for display.
//! - **Mint invitations** for Bubble NFT contracts, signed through an
//!   external [`Signer`].
//!
//! No key material is held here. Signing is delegated to the caller's key
//! store through the [`Signer`] trait.

pub mod checksum;
pub mod error;
pub mod invite;
pub mod keccak;
pub mod packet;
pub mod permission;

// Re-export primary types.
pub use checksum::{is_checksum_address, to_checksum_address};
pub use error::CryptoError;
pub use invite::{
    invitation_nonce, parse_duration, MintInvitation, MintNextInvitation, SignedInvitation, Signer,
    DEFAULT_EXPIRY,
};
pub use keccak::{data_hash, keccak256, keccak256_hex};
pub use packet::{encode_packed, parse_field, PacketField, PacketType};
pub use permission::{permission_hash, permission_hash_hex};
