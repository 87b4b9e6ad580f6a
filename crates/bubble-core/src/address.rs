//! # Address and File Identifiers
//!
//! Validated newtypes for the hex identifiers that flow through the tool:
//!
//! - [`Address`] — a 20-byte account or contract address, `0x` + 40 hex.
//! - [`HexId`] — a 20- or 32-byte file/directory id inside a vault.
//! - [`FileRef`] — either a bare [`HexId`] or a compound `<id>/<name>` path.
//!
//! Each type keeps the text it was built from, so mixed-case (EIP-55)
//! input is displayed the way the user typed it. Equality and hashing
//! compare the decoded bytes: `0xABCD…` and `0xabcd…` are the same address.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::bytes::{bytes_to_hex, is_hex_digits};
use crate::error::ValidationError;

/// Default vault file holding a persona's public identity document.
pub const PUBLIC_ID_FILE: &str = "0x0000000000000000000000000000000000000102";

/// Routes string deserialization through the type's validating constructor
/// and serializes back as the stored text.
macro_rules! impl_string_serde {
    ($ty:ident) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte address in `0x`-prefixed hex.
#[derive(Debug, Clone)]
pub struct Address {
    text: String,
    bytes: [u8; 20],
}

impl_string_serde!(Address);

impl Address {
    /// Address width in bytes.
    pub const LENGTH: usize = 20;

    /// Parse and validate an address, preserving its casing.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAddress`] unless the input is `0x`
    /// followed by exactly 40 hex digits.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidAddress(s.to_string());
        let digits = s.strip_prefix("0x").ok_or_else(invalid)?;
        if digits.len() != Self::LENGTH * 2 || !is_hex_digits(digits) {
            return Err(invalid());
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid())?;
        Ok(Self {
            text: s.to_string(),
            bytes,
        })
    }

    /// Returns true if `s` is a syntactically valid address.
    pub fn is_address(s: &str) -> bool {
        Self::parse(s).is_ok()
    }

    /// Build the canonical lower-case address for raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self {
            text: format!("0x{}", bytes_to_hex(&bytes)),
            bytes,
        }
    }

    /// The address text as given at construction.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The raw 20 bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.bytes
    }

    /// The 40 hex digits as given, without the `0x` prefix.
    pub fn hex_digits(&self) -> &str {
        &self.text[2..]
    }

    /// Canonical lower-case form.
    pub fn to_lowercase(&self) -> Self {
        Self::from_bytes(self.bytes)
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for Address {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// HexId
// ---------------------------------------------------------------------------

/// A file or directory id: 20 or 32 bytes of `0x`-prefixed hex.
#[derive(Debug, Clone)]
pub struct HexId {
    text: String,
    bytes: Vec<u8>,
}

impl_string_serde!(HexId);

impl HexId {
    /// Accepted id widths in bytes.
    pub const LENGTHS: [usize; 2] = [20, 32];

    /// Parse and validate a file id, preserving its casing.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidFile`] unless the input is `0x`
    /// followed by 40 or 64 hex digits.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidFile(s.to_string());
        let digits = s.strip_prefix("0x").ok_or_else(invalid)?;
        if !Self::LENGTHS.contains(&(digits.len() / 2))
            || digits.len() % 2 != 0
            || !is_hex_digits(digits)
        {
            return Err(invalid());
        }
        let bytes = hex::decode(digits).map_err(|_| invalid())?;
        Ok(Self {
            text: s.to_string(),
            bytes,
        })
    }

    /// Build the canonical lower-case id for raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidFile`] unless `bytes` is 20 or 32 long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        let text = format!("0x{}", bytes_to_hex(bytes));
        if !Self::LENGTHS.contains(&bytes.len()) {
            return Err(ValidationError::InvalidFile(text));
        }
        Ok(Self {
            text,
            bytes: bytes.to_vec(),
        })
    }

    /// The id text as given at construction.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The raw id bytes (20 or 32).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Canonical lower-case form.
    pub fn to_lowercase(&self) -> Self {
        Self {
            text: format!("0x{}", bytes_to_hex(&self.bytes)),
            bytes: self.bytes.clone(),
        }
    }
}

impl From<Address> for HexId {
    fn from(address: Address) -> Self {
        Self {
            text: address.text,
            bytes: address.bytes.to_vec(),
        }
    }
}

impl PartialEq for HexId {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for HexId {}

impl Hash for HexId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl std::fmt::Display for HexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl std::str::FromStr for HexId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// FileRef
// ---------------------------------------------------------------------------

/// A file inside a vault: a bare id, or a named entry in a directory id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileRef {
    /// A 20- or 32-byte file id.
    Id(HexId),
    /// `<dir>/<name>`: a file named `name` inside directory `dir`.
    Path {
        /// The directory id.
        dir: HexId,
        /// The file name within the directory. Never empty, never contains `/`.
        name: String,
    },
}

impl_string_serde!(FileRef);

impl FileRef {
    /// Parse a file id or a single-level `<id>/<name>` path.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidFile`] for anything else, including
    /// paths with more than one `/` or an empty name.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidFile(s.to_string());
        match s.split_once('/') {
            None => HexId::parse(s).map(Self::Id),
            Some((dir, name)) => {
                if name.is_empty() || name.contains('/') {
                    return Err(invalid());
                }
                let dir = HexId::parse(dir).map_err(|_| invalid())?;
                Ok(Self::Path {
                    dir,
                    name: name.to_string(),
                })
            }
        }
    }

    /// The persona public-identity file.
    pub fn public_id() -> Self {
        // PUBLIC_ID_FILE is a well-formed 20-byte id.
        Self::Id(HexId {
            text: PUBLIC_ID_FILE.to_string(),
            bytes: {
                let mut b = vec![0u8; 20];
                b[18] = 0x01;
                b[19] = 0x02;
                b
            },
        })
    }

    /// Returns true if this is the persona public-identity file.
    pub fn is_public_id(&self) -> bool {
        *self == Self::public_id()
    }

    /// The id of the file, or of its directory for a path.
    pub fn id(&self) -> &HexId {
        match self {
            Self::Id(id) => id,
            Self::Path { dir, .. } => dir,
        }
    }

    /// Bytes carried by the `file=` URL parameter.
    ///
    /// A bare id travels as its raw bytes; a path travels as the UTF-8 text
    /// `0x<hex>/<name>`. A path is always at least 44 bytes long, so it
    /// can never be mistaken for a 20- or 32-byte id on decode.
    pub fn to_param_bytes(&self) -> Vec<u8> {
        match self {
            Self::Id(id) => id.as_bytes().to_vec(),
            Self::Path { .. } => self.to_string().into_bytes(),
        }
    }

    /// Inverse of [`FileRef::to_param_bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidFile`] if the bytes are neither a
    /// 20/32-byte id nor the text of a valid path.
    pub fn from_param_bytes(bytes: &[u8]) -> Result<Self, ValidationError> {
        if HexId::LENGTHS.contains(&bytes.len()) {
            return HexId::from_bytes(bytes).map(Self::Id);
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|_| ValidationError::InvalidFile(format!("0x{}", bytes_to_hex(bytes))))?;
        if !text.contains('/') {
            return Err(ValidationError::InvalidFile(text.to_string()));
        }
        Self::parse(text)
    }

    /// Canonical lower-case form of the id part. Names are kept verbatim.
    pub fn to_lowercase(&self) -> Self {
        match self {
            Self::Id(id) => Self::Id(id.to_lowercase()),
            Self::Path { dir, name } => Self::Path {
                dir: dir.to_lowercase(),
                name: name.clone(),
            },
        }
    }
}

impl From<HexId> for FileRef {
    fn from(id: HexId) -> Self {
        Self::Id(id)
    }
}

impl From<Address> for FileRef {
    fn from(address: Address) -> Self {
        Self::Id(address.into())
    }
}

impl std::fmt::Display for FileRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Path { dir, name } => write!(f, "{dir}/{name}"),
        }
    }
}

impl std::str::FromStr for FileRef {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
