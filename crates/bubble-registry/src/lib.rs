//! # bubble-registry — Labels, Resolution and Discovery for Bubble Tools
//!
//! The stateful side of identifier handling:
//!
//! - **Stores** ([`store`]) — address book, server list and wallet labels,
//!   each an explicit object owning its entries and persisted as JSON.
//! - **Resolver** ([`resolver`]) — turns user-typed labels, DIDs, hex and
//!   decimal literals and `dir/name` paths into canonical addresses and
//!   provider endpoints, reading a snapshot of the stores.
//! - **Discovery** ([`discovery`]) — completes short DIDs through the
//!   published provider hash.
//!
//! Network and key-store access stay outside this crate, behind the
//! [`KeyStore`] and [`ProviderHashSource`] traits.

pub mod discovery;
pub mod error;
pub mod resolver;
pub mod store;

// Re-export primary types.
pub use discovery::{
    discover_provider, provider_hash, DidResolver, KnownProvider, ProviderHashSource,
    KNOWN_PROVIDERS,
};
pub use error::{DiscoveryError, ResolutionError, StoreError};
pub use resolver::{LabelResolver, ResolvedAddress, ResolvedServer};
pub use store::{
    AddressBook, AddressBookEntry, KeyStore, ServerEntry, ServerList, WalletKeyRef, WalletLabels,
    DEFAULT_KEY, INITIAL_KEY,
};
