//! # Packed Encoding
//!
//! Deterministic, type-tagged concatenation of values into a byte buffer,
//! matching Solidity's `abi.encodePacked` for the types Bubble contracts
//! verify: no separators, no length prefixes, fixed width per field.
//!
//! | Field | Bytes |
//! |-------|-------|
//! | `Text` | UTF-8 bytes of the value, its own length |
//! | `Hex { len: None }` | decoded hex at natural width |
//! | `Hex { len: Some(n) }` | decoded hex right-aligned into `n` bytes |
//! | `Address` | 20 bytes |
//! | `Bool` | 1 byte, `0x01` or `0x00` |
//! | `Uint { bits }` | big-endian, `bits / 8` bytes |
//!
//! The field list is a closed enum chosen at the call site. String tags
//! such as `uint32` are only parsed at the CLI boundary by
//! [`PacketType::from_str`](std::str::FromStr).
//!
//! A value that does not fit its declared width is an error. Nothing is
//! ever truncated, since a truncated packet would hash and sign as a
//! different payload than the caller intended.

use bubble_core::bytes::{decode_hex, is_hex_digits, strip_hex_prefix, uint_to_bytes};
use bubble_core::Address;

use crate::error::CryptoError;

/// Default `uint` width in bits when none is given.
pub const DEFAULT_UINT_BITS: usize = 256;

/// A single typed value in a packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketField {
    /// Raw UTF-8 text.
    Text(String),
    /// Hex bytes, optionally right-aligned into a fixed width.
    Hex {
        /// Hex digits, with or without `0x`.
        value: String,
        /// Fixed width in bytes; `None` keeps the natural width.
        len: Option<usize>,
    },
    /// A 20-byte address.
    Address(Address),
    /// A single boolean byte.
    Bool(bool),
    /// A big-endian unsigned integer.
    Uint {
        /// The value.
        value: u128,
        /// Width in bits: a multiple of 8 from 8 to 256.
        bits: usize,
    },
}

impl PacketField {
    /// `uint256` field.
    pub fn uint256(value: u128) -> Self {
        Self::Uint { value, bits: 256 }
    }

    /// `uint128` field.
    pub fn uint128(value: u128) -> Self {
        Self::Uint { value, bits: 128 }
    }

    /// `uint32` field.
    pub fn uint32(value: u32) -> Self {
        Self::Uint {
            value: u128::from(value),
            bits: 32,
        }
    }

    /// `text` field.
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }

    /// Fixed-width `hexN` field from raw bytes.
    pub fn fixed_bytes(bytes: &[u8]) -> Self {
        Self::Hex {
            value: hex::encode(bytes),
            len: Some(bytes.len()),
        }
    }

    /// Append this field's bytes to `out`.
    ///
    /// # Errors
    ///
    /// [`CryptoError::ValueOutOfRange`] for an integer wider than its field,
    /// [`CryptoError::InvalidPacketValue`] for malformed or over-long hex,
    /// [`CryptoError::InvalidPacketType`] for an unsupported uint width.
    pub fn encode_into(&self, out: &mut Vec<u8>) -> Result<(), CryptoError> {
        match self {
            Self::Text(text) => out.extend_from_slice(text.as_bytes()),
            Self::Hex { value, len } => out.extend(encode_hex(value, *len)?),
            Self::Address(address) => out.extend_from_slice(address.as_bytes()),
            Self::Bool(flag) => out.push(u8::from(*flag)),
            Self::Uint { value, bits } => {
                check_uint_bits(*bits)?;
                let bytes = uint_to_bytes(*value, bits / 8).map_err(|_| {
                    CryptoError::ValueOutOfRange {
                        value: *value,
                        bits: *bits,
                    }
                })?;
                out.extend(bytes);
            }
        }
        Ok(())
    }
}

fn encode_hex(value: &str, len: Option<usize>) -> Result<Vec<u8>, CryptoError> {
    let invalid = || CryptoError::InvalidPacketValue {
        kind: len.map_or_else(|| "hex".to_string(), |n| format!("hex{n}")),
        value: value.to_string(),
    };
    let digits = strip_hex_prefix(value);
    if !digits.is_empty() && !is_hex_digits(digits) {
        return Err(invalid());
    }
    let decoded = decode_hex(value).map_err(|_| invalid())?;
    match len {
        None => Ok(decoded),
        Some(n) => {
            let significant = decoded.iter().skip_while(|b| **b == 0).count();
            if significant > n {
                return Err(invalid());
            }
            let mut out = vec![0u8; n];
            out[n - significant..].copy_from_slice(&decoded[decoded.len() - significant..]);
            Ok(out)
        }
    }
}

fn check_uint_bits(bits: usize) -> Result<(), CryptoError> {
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(CryptoError::InvalidPacketType(format!("uint{bits}")));
    }
    Ok(())
}

/// Concatenate fields into one packed buffer.
///
/// Pure and deterministic: identical fields always produce identical bytes.
///
/// # Errors
///
/// The first field error, as [`PacketField::encode_into`].
pub fn encode_packed(fields: &[PacketField]) -> Result<Vec<u8>, CryptoError> {
    let mut out = Vec::new();
    for field in fields {
        field.encode_into(&mut out)?;
    }
    Ok(out)
}

/// A packet type tag, parsed from strings such as `uint32` or `hex20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    /// `text`
    Text,
    /// `hex` or `hexN` (N bytes).
    Hex(Option<usize>),
    /// `address`
    Address,
    /// `bool`
    Bool,
    /// `uint` or `uintN` (N bits).
    Uint(usize),
}

impl std::str::FromStr for PacketType {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CryptoError::InvalidPacketType(s.to_string());
        let width = |suffix: &str| -> Result<Option<usize>, CryptoError> {
            if suffix.is_empty() {
                return Ok(None);
            }
            if !suffix.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            suffix.parse().map(Some).map_err(|_| invalid())
        };

        match s {
            "text" => Ok(Self::Text),
            "address" => Ok(Self::Address),
            "bool" => Ok(Self::Bool),
            _ => {
                if let Some(suffix) = s.strip_prefix("uint") {
                    let bits = width(suffix)?.unwrap_or(DEFAULT_UINT_BITS);
                    check_uint_bits(bits).map_err(|_| invalid())?;
                    Ok(Self::Uint(bits))
                } else if let Some(suffix) = s.strip_prefix("hex") {
                    match width(suffix)? {
                        Some(0) => Err(invalid()),
                        len => Ok(Self::Hex(len)),
                    }
                } else {
                    Err(invalid())
                }
            }
        }
    }
}

impl PacketType {
    /// Build a field of this type from a textual value.
    ///
    /// `uint` values are decimal, or `0x` hex for values wider than 128 bits.
    /// `bool` accepts `true`/`false`/`1`/`0`.
    ///
    /// # Errors
    ///
    /// [`CryptoError::InvalidPacketValue`] if the value does not parse.
    pub fn field(self, value: &str) -> Result<PacketField, CryptoError> {
        let invalid = |kind: &str| CryptoError::InvalidPacketValue {
            kind: kind.to_string(),
            value: value.to_string(),
        };
        match self {
            Self::Text => Ok(PacketField::Text(value.to_string())),
            Self::Hex(len) => Ok(PacketField::Hex {
                value: value.to_string(),
                len,
            }),
            Self::Address => Address::parse(value)
                .map(PacketField::Address)
                .map_err(|_| invalid("address")),
            Self::Bool => match value {
                "true" | "1" => Ok(PacketField::Bool(true)),
                "false" | "0" => Ok(PacketField::Bool(false)),
                _ => Err(invalid("bool")),
            },
            Self::Uint(bits) => {
                if value.starts_with("0x") {
                    // Wide values travel as fixed-width hex with identical bytes.
                    return Ok(PacketField::Hex {
                        value: value.to_string(),
                        len: Some(bits / 8),
                    });
                }
                value
                    .parse::<u128>()
                    .map(|value| PacketField::Uint { value, bits })
                    .map_err(|_| invalid(&format!("uint{bits}")))
            }
        }
    }
}

/// Parse a `type:value` argument, e.g. `uint32:3` or `address:0x…`.
///
/// # Errors
///
/// [`CryptoError::InvalidPacketType`] if there is no `:` or the type is
/// unknown, otherwise as [`PacketType::field`].
pub fn parse_field(arg: &str) -> Result<PacketField, CryptoError> {
    let (kind, value) = arg
        .split_once(':')
        .ok_or_else(|| CryptoError::InvalidPacketType(arg.to_string()))?;
    kind.parse::<PacketType>()?.field(value)
}
