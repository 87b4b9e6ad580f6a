//! # Content Identifiers
//!
//! [`ContentIdentifier`] addresses a piece of off-chain content: the chain
//! and access-control contract that govern it, the storage provider that
//! hosts it, and optionally the file within the vault.
//!
//! Identifiers are immutable. The `with_*` builders consume the value and
//! return a new one, so "adding a file" to an identifier is an explicit
//! rebuild. String encodings live in [`crate::bubble_url`]; the methods
//! here only delegate.

use serde::{Deserialize, Serialize};

use crate::address::{Address, FileRef};
use crate::bubble_url;
use crate::error::{CodecError, ValidationError};

/// A blockchain identifier: a numeric chain id or a symbolic network name.
///
/// Opaque to the codec and carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Chain {
    /// EIP-155 chain id, e.g. `45021` for bubblenet.
    Id(u64),
    /// Network name, e.g. `"bubblenet"`.
    Name(String),
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl std::str::FromStr for Chain {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<u64>()
            .map(Self::Id)
            .unwrap_or_else(|_| Self::Name(s.to_string())))
    }
}

impl From<u64> for Chain {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

/// A storage provider ("vault server"): endpoint url plus its signing address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawProvider")]
pub struct Provider {
    url: String,
    id: Address,
}

#[derive(Deserialize)]
struct RawProvider {
    url: String,
    id: Address,
}

impl TryFrom<RawProvider> for Provider {
    type Error = ValidationError;

    fn try_from(raw: RawProvider) -> Result<Self, Self::Error> {
        Self::new(&raw.url, raw.id)
    }
}

impl Provider {
    /// Shortest url accepted, in characters.
    pub const MIN_URL_LENGTH: usize = 4;

    /// Create a provider, validating the url.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidProviderUrl`] if the url is shorter
    /// than [`Provider::MIN_URL_LENGTH`] or is not an absolute URL.
    pub fn new(url: &str, id: Address) -> Result<Self, ValidationError> {
        if url.chars().count() < Self::MIN_URL_LENGTH || url::Url::parse(url).is_err() {
            return Err(ValidationError::InvalidProviderUrl(url.to_string()));
        }
        Ok(Self {
            url: url.to_string(),
            id,
        })
    }

    /// Parse both parts from user-supplied strings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAddress`] for a malformed id and
    /// [`ValidationError::InvalidProviderUrl`] for a malformed url.
    pub fn parse(url: &str, id: &str) -> Result<Self, ValidationError> {
        Self::new(url, Address::parse(id)?)
    }

    /// The provider endpoint, exactly as given.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The provider's signing address.
    pub fn id(&self) -> &Address {
        &self.id
    }
}

/// The structured (chain, contract, provider, file) tuple.
///
/// Equality compares chain, contract, provider and file, with hex values
/// compared by their bytes so casing never matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentIdentifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chain: Option<Chain>,
    contract: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    provider: Option<Provider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<FileRef>,
}

impl ContentIdentifier {
    /// An identifier naming only a contract.
    pub fn new(contract: Address) -> Self {
        Self {
            chain: None,
            contract,
            provider: None,
            file: None,
        }
    }

    /// Build from user-supplied strings, validating every part.
    ///
    /// `provider` is `(url, id)`.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] of the first part that fails.
    pub fn from_parts(
        contract: &str,
        provider: Option<(&str, &str)>,
        file: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let mut id = Self::new(Address::parse(contract)?);
        if let Some((url, provider_id)) = provider {
            id = id.with_provider(Provider::parse(url, provider_id)?);
        }
        if let Some(file) = file {
            id = id.with_file(FileRef::parse(file)?);
        }
        Ok(id)
    }

    /// Returns a copy on the given chain.
    pub fn with_chain(self, chain: Chain) -> Self {
        Self {
            chain: Some(chain),
            ..self
        }
    }

    /// Returns a copy served by the given provider.
    pub fn with_provider(self, provider: Provider) -> Self {
        Self {
            provider: Some(provider),
            ..self
        }
    }

    /// Returns a copy pointing at the given file, replacing any previous one.
    pub fn with_file(self, file: FileRef) -> Self {
        Self {
            file: Some(file),
            ..self
        }
    }

    /// Returns a copy with no file.
    pub fn without_file(self) -> Self {
        Self { file: None, ..self }
    }

    /// The chain, if known.
    pub fn chain(&self) -> Option<&Chain> {
        self.chain.as_ref()
    }

    /// The access-control contract.
    pub fn contract(&self) -> &Address {
        &self.contract
    }

    /// The storage provider, if known.
    pub fn provider(&self) -> Option<&Provider> {
        self.provider.as_ref()
    }

    /// The file within the vault, if any.
    pub fn file(&self) -> Option<&FileRef> {
        self.file.as_ref()
    }

    /// Render as `bubble:…`.
    pub fn to_bubble_url(&self) -> String {
        bubble_url::encode_bubble_url(self)
    }

    /// Render as `did:bubble:…`.
    pub fn to_did(&self) -> String {
        bubble_url::encode_did(self)
    }

    /// Render as a short DID (no vault, default file omitted).
    pub fn to_short_did(&self) -> String {
        bubble_url::encode_short_did(self)
    }

    /// Parse a `bubble:` URL.
    ///
    /// # Errors
    ///
    /// See [`bubble_url::decode_bubble_url`].
    pub fn from_bubble_url(s: &str) -> Result<Self, CodecError> {
        bubble_url::decode_bubble_url(s)
    }

    /// Parse a `did:bubble:` DID.
    ///
    /// # Errors
    ///
    /// See [`bubble_url::decode_did`].
    pub fn from_did(s: &str) -> Result<Self, CodecError> {
        bubble_url::decode_did(s)
    }
}

impl std::fmt::Display for ContentIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_bubble_url())
    }
}

impl std::str::FromStr for ContentIdentifier {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        bubble_url::parse_any(s)
    }
}
