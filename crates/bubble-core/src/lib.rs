#![deny(missing_docs)]

//! # bubble-core — Identifier Types and Codecs for Bubble Tools
//!
//! This crate defines the identifier data model every other crate in the
//! workspace builds on. It has no internal crate dependencies, only `serde`,
//! `thiserror`, `bs58`, `hex` and `url` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Validated newtypes.** [`Address`], [`HexId`] and [`FileRef`] can only
//!    be built through constructors that check them, including when they
//!    are deserialized. Hex values compare by bytes, so casing never
//!    affects equality.
//!
//! 2. **Immutable identifiers.** A [`ContentIdentifier`] is rebuilt, never
//!    mutated, when a provider or file is attached.
//!
//! 3. **One codec for both string forms.** [`bubble_url`] owns the `bubble:`
//!    and `did:bubble:` encodings; the DID is the URL with a `did:` prefix.
//!    Decoders fail with a specific [`CodecError`] and never substitute
//!    defaults.
//!
//! 4. **Pure functions.** Nothing here performs I/O, logs or holds state.

pub mod address;
pub mod bubble_url;
pub mod bytes;
pub mod error;
pub mod identifier;

// Re-export primary types at crate root for ergonomic imports.
pub use address::{Address, FileRef, HexId, PUBLIC_ID_FILE};
pub use bubble_url::{
    decode_bubble_url, decode_bubble_url_on_chain, decode_did, decode_did_on_chain,
    encode_bubble_url, encode_did, encode_short_did, is_bubble_did, is_bubble_url, parse_any,
};
pub use error::{BubbleError, CodecError, ValidationError};
pub use identifier::{Chain, ContentIdentifier, Provider};
