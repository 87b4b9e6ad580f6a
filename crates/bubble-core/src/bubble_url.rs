//! # Bubble URL Codec
//!
//! Encodes and decodes the compact `bubble:` URL scheme and the
//! `did:bubble:` DID built on top of it.
//!
//! ## Wire Format
//!
//! ```text
//! bubble:<version><address>[?vault=<vault>][&file=<file>]
//! did:bubble:<version><address>[?vault=<vault>][&file=<file>]
//! ```
//!
//! - `version` — the version tag ([`URL_VERSION`]) as base-58, left-padded
//!   with `1` (the base-58 zero digit) to exactly two characters.
//! - `address` — base-58 of the 20 contract bytes, appended with no separator.
//!   Together with the version this is the "specific identifier".
//! - `vault` — base-58 of the UTF-8 text `<40 hex digits of provider id><url>`.
//! - `file` — base-58 of the raw file id bytes, or of the text
//!   `0x<hex>/<name>` for a directory path.
//!
//! The chain is not part of the encoding. Decoded identifiers carry no
//! chain; use [`decode_bubble_url_on_chain`] or [`decode_did_on_chain`] when
//! the chain is known from context.
//!
//! ## Decoding Policy
//!
//! Every malformed part fails with a specific [`CodecError`]. Empty
//! parameter values count as absent, the first occurrence of a repeated
//! parameter wins, and unknown parameters are ignored.

use crate::address::{Address, FileRef};
use crate::bytes::{base58_decode, base58_encode, base58_to_uint, bytes_to_hex, uint_to_base58};
use crate::error::{CodecError, ValidationError};
use crate::identifier::{Chain, ContentIdentifier, Provider};

/// Scheme prefix of a Bubble URL.
pub const BUBBLE_SCHEME: &str = "bubble:";

/// Outer prefix turning a Bubble URL into a DID.
pub const DID_PREFIX: &str = "did:";

/// Version tag emitted by this codec; the only one accepted on decode.
pub const URL_VERSION: u64 = 0;

/// Width of the version field in base-58 characters.
pub const VERSION_WIDTH: usize = 2;

const VAULT_PARAM: &str = "vault";
const FILE_PARAM: &str = "file";

/// Hex digits of the provider id at the start of a decoded vault parameter.
const VAULT_ID_DIGITS: usize = 40;

/// Shortest decoded vault text: the id digits plus a minimal url.
const MIN_VAULT_LENGTH: usize = VAULT_ID_DIGITS + Provider::MIN_URL_LENGTH;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode as `bubble:…` including every known parameter.
pub fn encode_bubble_url(id: &ContentIdentifier) -> String {
    let provider = id.provider();
    let file = id.file();
    format!(
        "{BUBBLE_SCHEME}{}{}",
        specific_identifier(id.contract()),
        query(provider, file)
    )
}

/// Encode as `did:bubble:…` including every known parameter.
pub fn encode_did(id: &ContentIdentifier) -> String {
    format!("{DID_PREFIX}{}", encode_bubble_url(id))
}

/// Encode as a short DID: no vault parameter, and no file parameter when
/// the file is the default public identity file.
pub fn encode_short_did(id: &ContentIdentifier) -> String {
    let file = id.file().filter(|f| !f.is_public_id());
    format!(
        "{DID_PREFIX}{BUBBLE_SCHEME}{}{}",
        specific_identifier(id.contract()),
        query(None, file)
    )
}

fn version_tag() -> String {
    format!("{:1>width$}", uint_to_base58(URL_VERSION), width = VERSION_WIDTH)
}

fn specific_identifier(contract: &Address) -> String {
    let mut out = version_tag();
    if let Some(address) = base58_encode(contract.as_bytes()) {
        out.push_str(&address);
    }
    out
}

fn vault_param(provider: &Provider) -> Option<String> {
    let text = format!("{}{}", provider.id().hex_digits(), provider.url());
    base58_encode(text.as_bytes())
}

fn query(provider: Option<&Provider>, file: Option<&FileRef>) -> String {
    let params: Vec<String> = [
        provider
            .and_then(vault_param)
            .map(|v| format!("{VAULT_PARAM}={v}")),
        file.and_then(|f| base58_encode(&f.to_param_bytes()))
            .map(|v| format!("{FILE_PARAM}={v}")),
    ]
    .into_iter()
    .flatten()
    .collect();

    if params.is_empty() {
        String::new()
    } else {
        format!("?{}", params.join("&"))
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a `bubble:` URL.
///
/// # Errors
///
/// - [`CodecError::NotBubbleUrl`] if the scheme is missing.
/// - [`CodecError::AddressTooShort`] if the specific identifier is under
///   three characters.
/// - [`CodecError::InvalidVersion`] for any version other than [`URL_VERSION`].
/// - [`CodecError::Base58Decode`] for non-alphabet characters.
/// - [`ValidationError::InvalidAddress`], [`ValidationError::InvalidVaultId`],
///   [`ValidationError::InvalidProviderUrl`] or [`ValidationError::InvalidFile`]
///   (wrapped in [`CodecError::Validation`]) for malformed components.
pub fn decode_bubble_url(s: &str) -> Result<ContentIdentifier, CodecError> {
    let rest = s
        .strip_prefix(BUBBLE_SCHEME)
        .ok_or_else(|| CodecError::NotBubbleUrl(s.to_string()))?;
    let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
    let (specific, query) = match rest.split_once('?') {
        Some((specific, query)) => (specific, Some(query)),
        None => (rest, None),
    };

    let mut id = ContentIdentifier::new(decode_specific_identifier(specific)?);

    if let Some(query) = query {
        if let Some(vault) = query_param(query, VAULT_PARAM) {
            id = id.with_provider(decode_vault(vault)?);
        }
        if let Some(file) = query_param(query, FILE_PARAM) {
            let bytes = base58_decode(file)?;
            id = id.with_file(FileRef::from_param_bytes(&bytes)?);
        }
    }
    Ok(id)
}

/// Decode a `did:bubble:` DID.
///
/// # Errors
///
/// [`CodecError::NotDid`] without the `did:` prefix,
/// [`CodecError::NotBubbleDid`] for another DID method, otherwise as
/// [`decode_bubble_url`].
pub fn decode_did(s: &str) -> Result<ContentIdentifier, CodecError> {
    let inner = s
        .strip_prefix(DID_PREFIX)
        .ok_or_else(|| CodecError::NotDid(s.to_string()))?;
    if !inner.starts_with(BUBBLE_SCHEME) {
        return Err(CodecError::NotBubbleDid(s.to_string()));
    }
    decode_bubble_url(inner)
}

/// [`decode_bubble_url`], attaching a chain known from context.
///
/// # Errors
///
/// As [`decode_bubble_url`].
pub fn decode_bubble_url_on_chain(s: &str, chain: Chain) -> Result<ContentIdentifier, CodecError> {
    decode_bubble_url(s).map(|id| id.with_chain(chain))
}

/// [`decode_did`], attaching a chain known from context.
///
/// # Errors
///
/// As [`decode_did`].
pub fn decode_did_on_chain(s: &str, chain: Chain) -> Result<ContentIdentifier, CodecError> {
    decode_did(s).map(|id| id.with_chain(chain))
}

/// Decode either form, choosing by prefix.
///
/// # Errors
///
/// As [`decode_did`] for strings starting `did:`, else as [`decode_bubble_url`].
pub fn parse_any(s: &str) -> Result<ContentIdentifier, CodecError> {
    if s.starts_with(DID_PREFIX) {
        decode_did(s)
    } else {
        decode_bubble_url(s)
    }
}

/// Returns true if `s` is a well-formed `did:bubble:` DID.
pub fn is_bubble_did(s: &str) -> bool {
    decode_did(s).is_ok()
}

/// Returns true if `s` is a well-formed `bubble:` URL.
pub fn is_bubble_url(s: &str) -> bool {
    decode_bubble_url(s).is_ok()
}

fn decode_specific_identifier(specific: &str) -> Result<Address, CodecError> {
    if specific.len() <= VERSION_WIDTH {
        return Err(CodecError::AddressTooShort(specific.to_string()));
    }
    let (version, address) = match (specific.get(..VERSION_WIDTH), specific.get(VERSION_WIDTH..)) {
        (Some(version), Some(address)) => (version, address),
        _ => return Err(CodecError::Base58Decode(format!("\"{specific}\""))),
    };

    let found = base58_to_uint(version)?;
    if found != URL_VERSION {
        return Err(CodecError::InvalidVersion {
            found,
            expected: URL_VERSION,
        });
    }

    let bytes = base58_decode(address)?;
    let bytes: [u8; Address::LENGTH] = bytes.as_slice().try_into().map_err(|_| {
        ValidationError::InvalidAddress(format!("0x{}", bytes_to_hex(&bytes)))
    })?;
    Ok(Address::from_bytes(bytes))
}

fn decode_vault(vault: &str) -> Result<Provider, CodecError> {
    let invalid = |detail: &str| ValidationError::InvalidVaultId(detail.to_string());
    let bytes = base58_decode(vault)?;
    let text = String::from_utf8(bytes).map_err(|_| invalid(vault))?;
    if text.chars().count() < MIN_VAULT_LENGTH {
        return Err(invalid(&text).into());
    }
    let (digits, url) = match (text.get(..VAULT_ID_DIGITS), text.get(VAULT_ID_DIGITS..)) {
        (Some(digits), Some(url)) => (digits, url),
        _ => return Err(invalid(&text).into()),
    };
    let id = format!("0x{digits}");
    let id = Address::parse(&id).map_err(|_| invalid(&id))?;
    Ok(Provider::new(url, id)?)
}

/// First non-empty value of `name` in a `k=v&k=v` query.
fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .find(|value| !value.is_empty())
}
