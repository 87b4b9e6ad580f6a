//! # Provider Discovery
//!
//! Completes a short DID (contract only) into a full content identifier.
//!
//! A Bubble contract publishes a hash of its storage provider rather than
//! the provider itself. The hash is `keccak256("<url>?id=<id>")`, computed
//! over the id text exactly as registered, so EIP-55 casing is significant.
//! Fetching that hash from the chain is an external call behind
//! [`ProviderHashSource`]; this module maps the hash back to a provider
//! through the [`KNOWN_PROVIDERS`] table.

use bubble_core::{parse_any, Address, ContentIdentifier, FileRef, Provider, ValidationError};
use bubble_crypto::keccak256;

use crate::error::DiscoveryError;

/// A storage provider whose hash is recognised without a network lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownProvider {
    /// `0x` hex of [`provider_hash`] for this provider.
    pub hash: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Provider signing address, as registered.
    pub id: &'static str,
    /// Provider endpoint.
    pub url: &'static str,
}

impl KnownProvider {
    /// The provider as a validated [`Provider`].
    ///
    /// # Errors
    ///
    /// A [`ValidationError`] if the table entry is malformed.
    pub fn provider(&self) -> Result<Provider, ValidationError> {
        Provider::parse(self.url, self.id)
    }
}

/// Providers recognised by hash.
pub const KNOWN_PROVIDERS: &[KnownProvider] = &[KnownProvider {
    hash: "0x077db7b2f0d920ab1eaf5bcfac4e58281ba017ce4c646ea332486372212ffeef",
    name: "Bubble Private Cloud",
    id: "0x288b32F2653C1d72043d240A7F938a114Ab69584",
    url: "https://datonavault.com:8131",
}];

/// `keccak256("<url>?id=<id>")` for a provider.
pub fn provider_hash(provider: &Provider) -> [u8; 32] {
    keccak256(format!("{}?id={}", provider.url(), provider.id()).as_bytes())
}

/// Look up a provider hash in [`KNOWN_PROVIDERS`].
pub fn discover_provider(hash: &[u8; 32]) -> Option<&'static KnownProvider> {
    let hash = format!("0x{}", hex::encode(hash));
    KNOWN_PROVIDERS.iter().find(|p| p.hash == hash)
}

/// External lookup of the provider hash a contract publishes.
pub trait ProviderHashSource {
    /// The provider hash registered by `contract`.
    ///
    /// # Errors
    ///
    /// [`DiscoveryError::Lookup`] if the lookup fails.
    fn provider_hash(&self, contract: &Address) -> Result<[u8; 32], DiscoveryError>;
}

/// Resolves short DIDs into full identifiers.
pub struct DidResolver<S> {
    source: S,
}

impl<S: ProviderHashSource> DidResolver<S> {
    /// Resolver backed by `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Parse a DID or Bubble URL, filling in the provider when absent and
    /// defaulting the file to the public identity file.
    ///
    /// # Errors
    ///
    /// [`DiscoveryError::Codec`] for a malformed DID,
    /// [`DiscoveryError::Lookup`] if the hash lookup fails,
    /// [`DiscoveryError::UnknownProviderHash`] for an unrecognised provider.
    pub fn resolve(&self, did: &str) -> Result<ContentIdentifier, DiscoveryError> {
        let mut id = parse_any(did)?;
        if id.provider().is_none() {
            let hash = self.source.provider_hash(id.contract())?;
            let known = discover_provider(&hash)
                .ok_or_else(|| DiscoveryError::UnknownProviderHash(format!("0x{}", hex::encode(hash))))?;
            let provider = known
                .provider()
                .map_err(|e| DiscoveryError::Lookup(e.to_string()))?;
            tracing::debug!(contract = %id.contract(), provider = known.name, "discovered provider");
            id = id.with_provider(provider);
        }
        if id.file().is_none() {
            id = id.with_file(FileRef::public_id());
        }
        Ok(id)
    }
}
