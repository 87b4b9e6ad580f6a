//! # Label Resolver
//!
//! Turns the strings a user types for contract, file and server arguments
//! into canonical addresses, directory paths and provider endpoints.
//!
//! ## Address Resolution Order
//!
//! 1. A valid `0x` + 40 hex address is returned as typed.
//! 2. A `bubble:` URL or `did:bubble:` DID yields its contract.
//! 3. `X/Y` (exactly one `/`) resolves `X` and keeps `Y` as a file name.
//!    More than one `/` never resolves.
//! 4. An address-book label, ignoring case.
//! 5. A wallet key label, ignoring case.
//! 6. A short `0x` literal, zero-padded on the left to 20 bytes.
//! 7. A base-10 integer of at most 160 bits, as a big-endian address.
//!
//! Anything else is unresolved. Each resolution is offered twice:
//! `try_resolve_*` returns `None` for optional arguments, `resolve_*`
//! returns a [`ResolutionError`] naming the argument.
//!
//! ## Server Resolution
//!
//! A server-list label first; otherwise an absolute URL whose `id` query
//! parameter is the provider address. The `id` value is itself resolved as
//! an address, so it may be a label.

use bubble_core::{parse_any, Address, FileRef, HexId, Provider, ValidationError};

use crate::error::ResolutionError;
use crate::store::{AddressBook, KeyStore, ServerList};

/// Hex digits in a 20-byte address.
const ADDRESS_DIGITS: usize = 40;

/// A resolved address argument: a plain address or a named entry in a
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedAddress {
    /// A 20-byte address.
    Address(Address),
    /// `<dir>/<name>`.
    Path {
        /// Directory address.
        dir: Address,
        /// File name within the directory, never empty.
        name: String,
    },
}

impl ResolvedAddress {
    /// The plain address, if this is not a path.
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Self::Address(address) => Some(address),
            Self::Path { .. } => None,
        }
    }

    /// Convert to a vault file reference.
    pub fn into_file_ref(self) -> FileRef {
        match self {
            Self::Address(address) => FileRef::from(address),
            Self::Path { dir, name } => FileRef::Path {
                dir: HexId::from(dir),
                name,
            },
        }
    }
}

impl std::fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Address(address) => write!(f, "{address}"),
            Self::Path { dir, name } => write!(f, "{dir}/{name}"),
        }
    }
}

/// A resolved storage provider endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedServer {
    /// Endpoint url: scheme, host, port and path, without query.
    pub url: String,
    /// Provider signing address, when known.
    pub id: Option<Address>,
}

impl ResolvedServer {
    /// Convert to a [`Provider`] for embedding in a content identifier.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidAddress`] when the id is unknown,
    /// [`ValidationError::InvalidProviderUrl`] for a malformed url.
    pub fn to_provider(&self) -> Result<Provider, ValidationError> {
        let id = self
            .id
            .clone()
            .ok_or_else(|| ValidationError::InvalidAddress(format!("{} (no provider id)", self.url)))?;
        Provider::new(&self.url, id)
    }
}

/// Read-only resolver over a snapshot of the label stores.
pub struct LabelResolver<'a> {
    addresses: &'a AddressBook,
    wallet: &'a dyn KeyStore,
    servers: &'a ServerList,
    require_provider_id: bool,
}

impl<'a> LabelResolver<'a> {
    /// Resolver over the given stores. Servers require a provider id.
    pub fn new(addresses: &'a AddressBook, wallet: &'a dyn KeyStore, servers: &'a ServerList) -> Self {
        Self {
            addresses,
            wallet,
            servers,
            require_provider_id: true,
        }
    }

    /// Accept servers without a provider id (older protocol versions).
    pub fn allow_missing_provider_id(self) -> Self {
        Self {
            require_provider_id: false,
            ..self
        }
    }

    /// Resolve an address argument, or `None` if it does not resolve.
    pub fn try_resolve_address(&self, input: &str) -> Option<ResolvedAddress> {
        if let Ok(address) = Address::parse(input) {
            return Some(ResolvedAddress::Address(address));
        }
        if let Ok(id) = parse_any(input) {
            tracing::debug!(input, contract = %id.contract(), "resolved bubble identifier");
            return Some(ResolvedAddress::Address(id.contract().clone()));
        }
        if let Some((dir, name)) = input.split_once('/') {
            if name.is_empty() || name.contains('/') {
                return None;
            }
            let dir = self.try_resolve_plain(dir)?;
            return Some(ResolvedAddress::Path {
                dir,
                name: name.to_string(),
            });
        }
        self.try_resolve_plain(input).map(ResolvedAddress::Address)
    }

    /// Resolve an address argument.
    ///
    /// # Errors
    ///
    /// [`ResolutionError`] naming `field` if the input does not resolve.
    pub fn resolve_address(&self, input: &str, field: &str) -> Result<ResolvedAddress, ResolutionError> {
        self.try_resolve_address(input)
            .ok_or_else(|| ResolutionError::new(field, input))
    }

    /// Resolve an argument that must be a plain address, such as a contract.
    ///
    /// # Errors
    ///
    /// [`ResolutionError`] naming `field` if the input does not resolve or
    /// resolves to a path.
    pub fn resolve_contract(&self, input: &str, field: &str) -> Result<Address, ResolutionError> {
        match self.resolve_address(input, field)? {
            ResolvedAddress::Address(address) => Ok(address),
            ResolvedAddress::Path { .. } => Err(ResolutionError::new(field, input)),
        }
    }

    /// Resolve a file argument: a 20/32-byte id, a path, or anything
    /// [`LabelResolver::try_resolve_address`] accepts.
    ///
    /// # Errors
    ///
    /// [`ResolutionError`] naming `field` if the input does not resolve.
    pub fn resolve_file(&self, input: &str, field: &str) -> Result<FileRef, ResolutionError> {
        if let Ok(file) = FileRef::parse(input) {
            return Ok(file);
        }
        self.resolve_address(input, field)
            .map(ResolvedAddress::into_file_ref)
    }

    fn try_resolve_plain(&self, input: &str) -> Option<Address> {
        if let Ok(address) = Address::parse(input) {
            return Some(address);
        }
        if let Some(entry) = self.addresses.get(input) {
            tracing::debug!(label = input, address = %entry.address, "resolved address-book label");
            return Some(entry.address.clone());
        }
        if let Some(key) = self.wallet.find_key(input) {
            tracing::debug!(label = input, address = %key.address, "resolved wallet label");
            return Some(key.address);
        }
        if let Some(digits) = input.strip_prefix("0x") {
            return pad_hex(digits);
        }
        if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
            return decimal_address(input);
        }
        None
    }

    /// Resolve a server argument, or `None` if it does not resolve.
    pub fn try_resolve_server(&self, input: &str) -> Option<ResolvedServer> {
        if let Some(entry) = self.servers.get(input) {
            if entry.id.is_none() && self.require_provider_id {
                tracing::warn!(label = %entry.label, "server entry has no provider id");
                return None;
            }
            tracing::debug!(label = %entry.label, url = %entry.url, "resolved server label");
            return Some(ResolvedServer {
                url: entry.url.clone(),
                id: entry.id.clone(),
            });
        }

        let url = url::Url::parse(input).ok()?;
        let host = url.host_str()?;
        let mut endpoint = format!("{}://{host}", url.scheme());
        if let Some(port) = url.port() {
            endpoint.push_str(&format!(":{port}"));
        }
        endpoint.push_str(url.path());

        let id = url
            .query_pairs()
            .find(|(key, value)| key == "id" && !value.is_empty())
            .map(|(_, value)| value.into_owned());
        let id = match id {
            Some(id) => Some(self.try_resolve_address(&id)?.as_address()?.clone()),
            None if self.require_provider_id => return None,
            None => None,
        };
        Some(ResolvedServer { url: endpoint, id })
    }

    /// Resolve a server argument.
    ///
    /// # Errors
    ///
    /// [`ResolutionError`] naming `field` if the input does not resolve.
    pub fn resolve_server(&self, input: &str, field: &str) -> Result<ResolvedServer, ResolutionError> {
        self.try_resolve_server(input)
            .ok_or_else(|| ResolutionError::new(field, input))
    }
}

/// Left-pad hex digits to a 20-byte address; `None` if empty, too long or
/// not hex.
fn pad_hex(digits: &str) -> Option<Address> {
    if digits.is_empty() || digits.len() > ADDRESS_DIGITS {
        return None;
    }
    Address::parse(&format!("0x{digits:0>width$}", width = ADDRESS_DIGITS)).ok()
}

/// Accumulates base-10 digits into a 160-bit big-endian value.
fn decimal_address(digits: &str) -> Option<Address> {
    let mut value = [0u8; 20];
    for digit in digits.bytes() {
        let mut carry = u32::from(digit - b'0');
        for byte in value.iter_mut().rev() {
            let next = u32::from(*byte) * 10 + carry;
            *byte = (next & 0xff) as u8;
            carry = next >> 8;
        }
        if carry != 0 {
            return None;
        }
    }
    Some(Address::from_bytes(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AddressBookEntry, WalletKeyRef, WalletLabels};

    fn address(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    fn stores() -> (AddressBook, WalletLabels, ServerList) {
        let book = AddressBook::from_entries(vec![
            AddressBookEntry {
                label: "address1".into(),
                address: address("0x1111111111111111111111111111111111111111"),
                memo: None,
            },
            AddressBookEntry {
                label: "address2".into(),
                address: address("0x2222222222222222222222222222222222222222"),
                memo: None,
            },
        ]);
        let wallet = WalletLabels::from_keys(vec![WalletKeyRef {
            label: "key1".into(),
            address: address("0x4e16dd537432447fb9cec2726252accb4514abae"),
            public_key: None,
        }]);
        let mut servers = ServerList::new();
        servers
            .add("server1", "https://server1.com/path1/", "0x0123456789abcdef0123456789abcdef01234567")
            .unwrap();
        (book, wallet, servers)
    }

    #[test]
    fn literal_address_keeps_case() {
        let (book, wallet, servers) = stores();
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        let mixed = "0x61F05023348C82B41509ebFf37353f1BC8cFA480";
        assert_eq!(
            resolver.try_resolve_address(mixed).unwrap().to_string(),
            mixed
        );
    }

    #[test]
    fn labels_resolve_case_insensitively() {
        let (book, wallet, servers) = stores();
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        assert_eq!(
            resolver.try_resolve_address("ADDRESS1"),
            resolver.try_resolve_address("address1")
        );
        assert_eq!(
            resolver.try_resolve_address("Key1").unwrap().to_string(),
            "0x4e16dd537432447fb9cec2726252accb4514abae"
        );
    }

    #[test]
    fn address_book_wins_over_wallet() {
        let (book, _, servers) = stores();
        let wallet = WalletLabels::from_keys(vec![WalletKeyRef {
            label: "address1".into(),
            address: address("0x4e16dd537432447fb9cec2726252accb4514abae"),
            public_key: None,
        }]);
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        assert_eq!(
            resolver.try_resolve_address("address1").unwrap().to_string(),
            "0x1111111111111111111111111111111111111111"
        );
    }

    #[test]
    fn did_resolves_to_contract() {
        let (book, wallet, servers) = stores();
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        assert_eq!(
            resolver
                .try_resolve_address("did:bubble:11EnrGHeqCd5UQ2jTW2Mo32o6a2GG")
                .unwrap()
                .to_string(),
            "0x1111111111111111111111111111111111111111"
        );
    }

    #[test]
    fn compound_paths() {
        let (book, wallet, servers) = stores();
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        assert_eq!(
            resolver.try_resolve_address("10/filename").unwrap().to_string(),
            "0x000000000000000000000000000000000000000a/filename"
        );
        assert_eq!(
            resolver.try_resolve_address("address2/a.txt").unwrap().to_string(),
            "0x2222222222222222222222222222222222222222/a.txt"
        );
        assert!(resolver.try_resolve_address("10/a/b").is_none());
        assert!(resolver.try_resolve_address("10/").is_none());
        assert!(resolver.try_resolve_address("nobody/file").is_none());
    }

    #[test]
    fn hex_literals_pad() {
        let (book, wallet, servers) = stores();
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        assert_eq!(
            resolver.try_resolve_address("0x2").unwrap().to_string(),
            "0x0000000000000000000000000000000000000002"
        );
        assert!(resolver.try_resolve_address("0x").is_none());
        assert!(resolver
            .try_resolve_address(&format!("0x{}", "1".repeat(41)))
            .is_none());
        assert!(resolver.try_resolve_address("0xzz").is_none());
    }

    #[test]
    fn decimals_convert() {
        let (book, wallet, servers) = stores();
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        assert_eq!(
            resolver.try_resolve_address("258").unwrap().to_string(),
            "0x0000000000000000000000000000000000000102"
        );
        assert_eq!(
            resolver
                .try_resolve_address("999999999999999999999999999999999999999999999")
                .unwrap()
                .to_string(),
            "0x002cd76fe086b93ce2f768a00b229fffffffffff"
        );
    }

    #[test]
    fn decimals_cover_the_full_address_width() {
        let (book, wallet, servers) = stores();
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        assert_eq!(
            resolver
                .try_resolve_address("340282366920938463463374607431768211456")
                .unwrap()
                .to_string(),
            "0x0000000100000000000000000000000000000000"
        );
        assert_eq!(
            resolver
                .try_resolve_address("1461501637330902918203684832716283019655932542975")
                .unwrap()
                .to_string(),
            "0xffffffffffffffffffffffffffffffffffffffff"
        );
        assert!(resolver
            .try_resolve_address("1461501637330902918203684832716283019655932542976")
            .is_none());
        assert_eq!(
            resolver
                .try_resolve_address(&format!("{}7", "0".repeat(60)))
                .unwrap()
                .to_string(),
            "0x0000000000000000000000000000000000000007"
        );
    }

    #[test]
    fn unknown_input_fails_with_field() {
        let (book, wallet, servers) = stores();
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        assert!(resolver.try_resolve_address("nobody").is_none());
        let err = resolver.resolve_address("nobody", "contract").unwrap_err();
        assert_eq!(err, ResolutionError::new("contract", "nobody"));
        assert_eq!(format!("{err}"), "`contract` is invalid: nobody");
    }

    #[test]
    fn resolve_contract_rejects_paths() {
        let (book, wallet, servers) = stores();
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        assert!(resolver.resolve_contract("address1", "contract").is_ok());
        assert!(resolver.resolve_contract("address1/x", "contract").is_err());
    }

    #[test]
    fn resolve_file_accepts_long_ids() {
        let (book, wallet, servers) = stores();
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        let long = format!("0x{}", "ab".repeat(32));
        assert_eq!(resolver.resolve_file(&long, "file").unwrap().to_string(), long);
        assert_eq!(
            resolver.resolve_file("1", "file").unwrap().to_string(),
            "0x0000000000000000000000000000000000000001"
        );
        assert!(resolver.resolve_file("nobody", "file").is_err());
    }

    #[test]
    fn server_by_label() {
        let (book, wallet, servers) = stores();
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        let server = resolver.resolve_server("SERVER1", "server").unwrap();
        assert_eq!(server.url, "https://server1.com/path1/");
        assert_eq!(
            server.id.unwrap().as_str(),
            "0x0123456789abcdef0123456789abcdef01234567"
        );
    }

    #[test]
    fn server_by_url_with_labelled_id() {
        let (book, wallet, servers) = stores();
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        let server = resolver
            .resolve_server("https://server1.com/path1/?id=address2", "server")
            .unwrap();
        assert_eq!(server.url, "https://server1.com/path1/");
        assert_eq!(
            server.id.unwrap().as_str(),
            "0x2222222222222222222222222222222222222222"
        );
        let with_port = resolver
            .try_resolve_server("http://localhost:8131/?id=key1")
            .unwrap();
        assert_eq!(with_port.url, "http://localhost:8131/");
    }

    #[test]
    fn server_url_requires_id() {
        let (book, wallet, servers) = stores();
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        assert!(resolver.try_resolve_server("https://x.com/").is_none());
        assert!(resolver.try_resolve_server("https://x.com/?id=nobody").is_none());
        assert!(resolver.try_resolve_server("nonsense").is_none());
        let err = resolver.resolve_server("https://x.com/", "server").unwrap_err();
        assert_eq!(err.field, "server");

        let lenient = LabelResolver::new(&book, &wallet, &servers).allow_missing_provider_id();
        let server = lenient.try_resolve_server("https://x.com/").unwrap();
        assert!(server.id.is_none());
        assert!(server.to_provider().is_err());
    }

    #[test]
    fn resolved_server_to_provider() {
        let (book, wallet, servers) = stores();
        let resolver = LabelResolver::new(&book, &wallet, &servers);
        let provider = resolver
            .resolve_server("server1", "server")
            .unwrap()
            .to_provider()
            .unwrap();
        assert_eq!(provider.url(), "https://server1.com/path1/");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::store::WalletLabels;
    use proptest::prelude::*;

    proptest! {
        /// Decimal inputs resolve to the zero-padded hex of their value.
        #[test]
        fn decimal_matches_hex(value in any::<u64>()) {
            let (book, wallet, servers) = (AddressBook::new(), WalletLabels::new(), ServerList::new());
            let resolver = LabelResolver::new(&book, &wallet, &servers);
            let resolved = resolver.try_resolve_address(&value.to_string()).unwrap();
            prop_assert_eq!(resolved.to_string(), format!("0x{value:040x}"));
        }

        /// Inputs with more than one slash never resolve.
        #[test]
        fn multiple_slashes_never_resolve(a in "[0-9]{1,4}", b in "[a-z]{1,4}", c in "[a-z]{1,4}") {
            let (book, wallet, servers) = (AddressBook::new(), WalletLabels::new(), ServerList::new());
            let resolver = LabelResolver::new(&book, &wallet, &servers);
            let input = format!("{a}/{b}/{c}");
            prop_assert!(resolver.try_resolve_address(&input).is_none());
        }
    }
}
