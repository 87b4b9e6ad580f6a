//! # Error Hierarchy
//!
//! Structured error types for the identifier layer, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Validation errors carry the rejected input so that a user who typed a
//! label, a DID or a hex literal can see exactly what was refused. Codec
//! errors name the part of a `bubble:`/`did:bubble:` string that failed.

use thiserror::Error;

/// Top-level error type for `bubble-core`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BubbleError {
    /// A value failed identifier validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A `bubble:` or `did:bubble:` string could not be decoded.
    #[error("decode error: {0}")]
    Codec(#[from] CodecError),
}

/// Validation errors for identifier newtypes and byte conversions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Not a 20-byte `0x`-prefixed hex address.
    #[error("invalid address: \"{0}\" (expected 0x followed by 40 hex characters)")]
    InvalidAddress(String),

    /// The provider id inside a `vault` parameter is not an address.
    #[error("invalid vault id: \"{0}\"")]
    InvalidVaultId(String),

    /// Not a 20/32-byte file id or a `<id>/<name>` path.
    #[error("invalid file: \"{0}\" (expected a 20 or 32 byte hex id, or <id>/<name>)")]
    InvalidFile(String),

    /// Non-hex characters in a hex string.
    #[error("invalid hex: \"{0}\"")]
    InvalidHex(String),

    /// Provider url is empty, too short, or does not parse.
    #[error("invalid provider url: \"{0}\"")]
    InvalidProviderUrl(String),

    /// Integer does not fit the requested byte width.
    #[error("value {value} does not fit in {length} bytes")]
    ValueOutOfRange {
        /// The value that was rejected.
        value: u128,
        /// The byte width it had to fit.
        length: usize,
    },
}

/// Errors decoding the `bubble:` and `did:bubble:` schemes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The string does not start with `bubble:`.
    #[error("not a Bubble URL: \"{0}\"")]
    NotBubbleUrl(String),

    /// The string does not start with `did:`.
    #[error("not a DID: \"{0}\"")]
    NotDid(String),

    /// A DID whose method is not `bubble`.
    #[error("not a Bubble DID: \"{0}\"")]
    NotBubbleDid(String),

    /// The version tag is not one this codec understands.
    #[error("unsupported Bubble URL version {found} (expected {expected})")]
    InvalidVersion {
        /// The decoded version tag.
        found: u64,
        /// The version this codec emits.
        expected: u64,
    },

    /// The specific identifier is too short to hold version and address.
    #[error("specific identifier \"{0}\" is too short")]
    AddressTooShort(String),

    /// Non-alphabet characters in a base-58 string.
    #[error("base58 decode error: {0}")]
    Base58Decode(String),

    /// A decoded component failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
