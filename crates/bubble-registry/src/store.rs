//! # Label Stores
//!
//! Explicit store objects for the three label lists a user maintains:
//!
//! - [`AddressBook`] — label → address, with an optional memo.
//! - [`ServerList`] — label → storage provider url and id.
//! - [`WalletLabels`] — label → public key reference. Private keys live in
//!   the external key store; only the public half is listed here.
//!
//! Each store owns its entries and, when loaded from disk, the path it was
//! loaded from. Mutations change the in-memory list; [`AddressBook::save`]
//! and friends persist it. There is no process-wide cache: callers build a
//! store once and pass it by reference to the resolver.
//!
//! ## Label Rules
//!
//! Labels are lower-cased when stored and must be unique. Lookups fold the
//! query to lower case, so resolution is case-insensitive. Entries are kept
//! sorted by label.
//!
//! ## File Format
//!
//! A JSON array of entries. A missing file is an empty store.

use std::path::{Path, PathBuf};

use bubble_core::{parse_any, Address};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Wallet label that always names the active signing key.
pub const DEFAULT_KEY: &str = "default-key";

/// Wallet label binding this installation to the user's Bubble.
pub const INITIAL_KEY: &str = "initial-application-key";

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// An address-book entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBookEntry {
    /// Unique lower-case label.
    pub label: String,
    /// The address, casing preserved unless lower-cased on entry.
    pub address: Address,
    /// Free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// A storage-provider entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    /// Unique lower-case label.
    pub label: String,
    /// Unique lower-case provider url.
    pub url: String,
    /// Provider signing address. Older entries may lack one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Address>,
}

/// Public reference to a wallet key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletKeyRef {
    /// Key label.
    pub label: String,
    /// The key's address.
    pub address: Address,
    /// Uncompressed public key as `0x` hex, when known.
    #[serde(
        rename = "publicKey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub public_key: Option<String>,
}

/// A source of wallet key labels.
///
/// Implemented by [`WalletLabels`]; an external key store that can also
/// sign implements it to take part in label resolution.
pub trait KeyStore {
    /// Every key reference, in label order.
    fn key_refs(&self) -> Vec<WalletKeyRef>;

    /// Find a key by label, ignoring case.
    fn find_key(&self, label: &str) -> Option<WalletKeyRef> {
        let label = label_key(label);
        self.key_refs()
            .into_iter()
            .find(|k| label_key(&k.label) == label)
    }
}

// ---------------------------------------------------------------------------
// Persistence helpers
// ---------------------------------------------------------------------------

fn read_entries<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "store file absent, starting empty");
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries: Vec<T> = serde_json::from_str(&content).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), count = entries.len(), "loaded store");
    Ok(entries)
}

fn write_entries<T: Serialize>(path: &Path, entries: &[T]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, json).map_err(io_err)?;
    tracing::debug!(path = %path.display(), count = entries.len(), "saved store");
    Ok(())
}

/// Lookup key for a label: trimmed and lower-cased.
fn label_key(label: &str) -> String {
    label.trim().to_lowercase()
}

fn normalize_label(label: &str) -> Result<String, StoreError> {
    let label = label_key(label);
    if label.is_empty() {
        return Err(StoreError::EmptyLabel);
    }
    Ok(label)
}

fn save_to<T: Serialize>(path: Option<&Path>, entries: &[T]) -> Result<(), StoreError> {
    match path {
        Some(path) => write_entries(path, entries),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// AddressBook
// ---------------------------------------------------------------------------

/// Label → address store.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    path: Option<PathBuf>,
    entries: Vec<AddressBookEntry>,
}

impl AddressBook {
    /// Empty in-memory address book.
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory address book with the given entries, normalised and sorted.
    pub fn from_entries(entries: Vec<AddressBookEntry>) -> Self {
        let mut book = Self {
            path: None,
            entries,
        };
        book.normalize();
        book
    }

    /// Load from a JSON file. A missing file yields an empty book bound to `path`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] or [`StoreError::Json`] for an unreadable file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let mut book = Self {
            path: Some(path.to_path_buf()),
            entries: read_entries(path)?,
        };
        book.normalize();
        Ok(book)
    }

    /// Persist to the file this book was loaded from. In-memory books are
    /// not written.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] if the file cannot be written.
    pub fn save(&self) -> Result<(), StoreError> {
        save_to(self.path.as_deref(), &self.entries)
    }

    fn normalize(&mut self) {
        for entry in &mut self.entries {
            entry.label = label_key(&entry.label);
        }
        self.entries.sort_by(|a, b| a.label.cmp(&b.label));
    }

    /// All entries in label order.
    pub fn entries(&self) -> &[AddressBookEntry] {
        &self.entries
    }

    /// Entry for `label`, ignoring case.
    pub fn get(&self, label: &str) -> Option<&AddressBookEntry> {
        let label = label_key(label);
        self.entries.iter().find(|e| e.label == label)
    }

    /// Add an entry.
    ///
    /// `address` may be a hex address or a Bubble DID/URL, whose contract is
    /// stored. With `lowercase` the address is stored in canonical lower case.
    ///
    /// # Errors
    ///
    /// [`StoreError::EmptyLabel`], [`StoreError::DuplicateLabel`], or a
    /// validation/codec error for the address.
    pub fn add(
        &mut self,
        label: &str,
        address: &str,
        memo: Option<String>,
        lowercase: bool,
    ) -> Result<&AddressBookEntry, StoreError> {
        let label = normalize_label(label)?;
        let mut address = if address.starts_with("did:") || address.starts_with("bubble:") {
            parse_any(address)?.contract().clone()
        } else {
            Address::parse(address)?
        };
        if lowercase {
            address = address.to_lowercase();
        }
        if self.get(&label).is_some() {
            return Err(StoreError::DuplicateLabel {
                kind: "address",
                label,
            });
        }
        tracing::info!(label = %label, address = %address, "adding address");
        self.entries.push(AddressBookEntry {
            label: label.clone(),
            address,
            memo: memo.filter(|m| !m.is_empty()),
        });
        self.normalize();
        self.entries
            .iter()
            .find(|e| e.label == label)
            .ok_or(StoreError::UnknownLabel {
                kind: "address",
                label,
            })
    }

    /// Remove the entry for `label`, ignoring case.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownLabel`] if there is no such entry.
    pub fn remove(&mut self, label: &str) -> Result<AddressBookEntry, StoreError> {
        let label = label_key(label);
        let index = self
            .entries
            .iter()
            .position(|e| e.label == label)
            .ok_or_else(|| StoreError::UnknownLabel {
                kind: "address",
                label: label.clone(),
            })?;
        tracing::info!(label = %label, "removing address");
        Ok(self.entries.remove(index))
    }
}

// ---------------------------------------------------------------------------
// ServerList
// ---------------------------------------------------------------------------

/// Label → storage provider store.
#[derive(Debug, Clone, Default)]
pub struct ServerList {
    path: Option<PathBuf>,
    entries: Vec<ServerEntry>,
}

impl ServerList {
    /// Empty in-memory server list.
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory server list with the given entries, normalised and sorted.
    pub fn from_entries(entries: Vec<ServerEntry>) -> Self {
        let mut list = Self {
            path: None,
            entries,
        };
        list.normalize();
        list
    }

    /// Load from a JSON file. A missing file yields an empty list bound to `path`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] or [`StoreError::Json`] for an unreadable file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let mut list = Self {
            path: Some(path.to_path_buf()),
            entries: read_entries(path)?,
        };
        list.normalize();
        Ok(list)
    }

    /// Persist to the file this list was loaded from.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] if the file cannot be written.
    pub fn save(&self) -> Result<(), StoreError> {
        save_to(self.path.as_deref(), &self.entries)
    }

    fn normalize(&mut self) {
        for entry in &mut self.entries {
            entry.label = label_key(&entry.label);
        }
        self.entries.sort_by(|a, b| a.label.cmp(&b.label));
    }

    /// All entries in label order.
    pub fn entries(&self) -> &[ServerEntry] {
        &self.entries
    }

    /// Entry for `label`, ignoring case.
    pub fn get(&self, label: &str) -> Option<&ServerEntry> {
        let label = label_key(label);
        self.entries.iter().find(|e| e.label == label)
    }

    /// Add a server. Label and url are lower-cased; both must be unique.
    ///
    /// # Errors
    ///
    /// [`StoreError::EmptyLabel`], [`StoreError::InvalidUrl`],
    /// [`StoreError::DuplicateLabel`], [`StoreError::DuplicateUrl`], or an
    /// invalid id.
    pub fn add(&mut self, label: &str, url: &str, id: &str) -> Result<&ServerEntry, StoreError> {
        let label = normalize_label(label)?;
        let id = Address::parse(id)?;
        if url::Url::parse(url).is_err() {
            return Err(StoreError::InvalidUrl(url.to_string()));
        }
        let url = url.to_lowercase();
        if self.get(&label).is_some() {
            return Err(StoreError::DuplicateLabel {
                kind: "server",
                label,
            });
        }
        if self.entries.iter().any(|e| e.url == url) {
            return Err(StoreError::DuplicateUrl(url));
        }
        tracing::info!(label = %label, url = %url, "adding server");
        self.entries.push(ServerEntry {
            label: label.clone(),
            url,
            id: Some(id),
        });
        self.normalize();
        self.entries
            .iter()
            .find(|e| e.label == label)
            .ok_or(StoreError::UnknownLabel {
                kind: "server",
                label,
            })
    }

    /// Remove the server for `label`, ignoring case.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownLabel`] if there is no such server.
    pub fn remove(&mut self, label: &str) -> Result<ServerEntry, StoreError> {
        let label = label_key(label);
        let index = self
            .entries
            .iter()
            .position(|e| e.label == label)
            .ok_or_else(|| StoreError::UnknownLabel {
                kind: "server",
                label: label.clone(),
            })?;
        tracing::info!(label = %label, "removing server");
        Ok(self.entries.remove(index))
    }
}

// ---------------------------------------------------------------------------
// WalletLabels
// ---------------------------------------------------------------------------

/// Public references to the keys held by the external key store.
#[derive(Debug, Clone, Default)]
pub struct WalletLabels {
    path: Option<PathBuf>,
    keys: Vec<WalletKeyRef>,
}

impl WalletLabels {
    /// Empty in-memory wallet.
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory wallet with the given key references.
    pub fn from_keys(keys: Vec<WalletKeyRef>) -> Self {
        let mut wallet = Self { path: None, keys };
        wallet.normalize();
        wallet
    }

    /// Load from a JSON file. A missing file yields an empty wallet bound to `path`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] or [`StoreError::Json`] for an unreadable file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let mut wallet = Self {
            path: Some(path.to_path_buf()),
            keys: read_entries(path)?,
        };
        wallet.normalize();
        Ok(wallet)
    }

    /// Persist to the file this wallet was loaded from.
    ///
    /// # Errors
    ///
    /// [`StoreError::Io`] if the file cannot be written.
    pub fn save(&self) -> Result<(), StoreError> {
        save_to(self.path.as_deref(), &self.keys)
    }

    fn normalize(&mut self) {
        for key in &mut self.keys {
            key.label = label_key(&key.label);
        }
        self.keys.sort_by(|a, b| a.label.cmp(&b.label));
    }

    /// All key references in label order.
    pub fn keys(&self) -> &[WalletKeyRef] {
        &self.keys
    }

    /// Record a key reference.
    ///
    /// # Errors
    ///
    /// [`StoreError::EmptyLabel`], [`StoreError::ProtectedLabel`] for the
    /// initial application key, [`StoreError::DuplicateLabel`], or an
    /// invalid address.
    pub fn import(
        &mut self,
        label: &str,
        address: &str,
        public_key: Option<String>,
    ) -> Result<&WalletKeyRef, StoreError> {
        let label = normalize_label(label)?;
        if label == INITIAL_KEY {
            return Err(StoreError::ProtectedLabel(INITIAL_KEY.to_string()));
        }
        let address = Address::parse(address)?;
        if self.keys.iter().any(|k| k.label == label) {
            return Err(StoreError::DuplicateLabel { kind: "key", label });
        }
        tracing::info!(label = %label, address = %address, "importing key reference");
        self.keys.push(WalletKeyRef {
            label: label.clone(),
            address,
            public_key,
        });
        self.normalize();
        self.keys
            .iter()
            .find(|k| k.label == label)
            .ok_or(StoreError::UnknownLabel { kind: "key", label })
    }

    /// Forget a key reference.
    ///
    /// # Errors
    ///
    /// [`StoreError::ProtectedLabel`] for the default and initial keys,
    /// [`StoreError::UnknownLabel`] if there is no such key.
    pub fn remove(&mut self, label: &str) -> Result<WalletKeyRef, StoreError> {
        let label = label_key(label);
        if label == DEFAULT_KEY || label == INITIAL_KEY {
            return Err(StoreError::ProtectedLabel(label));
        }
        let index = self
            .keys
            .iter()
            .position(|k| k.label == label)
            .ok_or_else(|| StoreError::UnknownLabel {
                kind: "key",
                label: label.clone(),
            })?;
        tracing::info!(label = %label, "removing key reference");
        Ok(self.keys.remove(index))
    }
}

impl KeyStore for WalletLabels {
    fn key_refs(&self) -> Vec<WalletKeyRef> {
        self.keys.clone()
    }

    fn find_key(&self, label: &str) -> Option<WalletKeyRef> {
        let label = label_key(label);
        self.keys.iter().find(|k| k.label == label).cloned()
    }
}
