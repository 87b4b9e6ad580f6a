//! # Crypto Error Types
//!
//! Structured errors for packet encoding, hashing and invitation signing in
//! `bubble-crypto`. Uses `thiserror` for diagnostic context.

use bubble_core::ValidationError;
use thiserror::Error;

/// Errors from signing-payload construction.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// A packet type tag is not one of `text`, `hex[N]`, `address`, `bool`, `uint[N]`.
    #[error("invalid packet type: \"{0}\"")]
    InvalidPacketType(String),

    /// A packet value cannot be represented as its declared type.
    #[error("invalid {kind} packet value: \"{value}\"")]
    InvalidPacketValue {
        /// The declared packet type.
        kind: String,
        /// The rejected value.
        value: String,
    },

    /// An unsigned integer does not fit its declared width.
    #[error("value {value} does not fit in uint{bits}")]
    ValueOutOfRange {
        /// The value that was rejected.
        value: u128,
        /// The declared width in bits.
        bits: usize,
    },

    /// A duration string such as `2w3d4h` is malformed.
    #[error("invalid duration: \"{0}\" (expected e.g. 12h, 28d or 2w3d)")]
    InvalidDuration(String),

    /// The external signer refused or failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// A compact invitation could not be decoded.
    #[error("invalid invitation: {0}")]
    InvalidInvitation(String),

    /// JSON serialization of a signed payload failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An identifier inside a payload failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
