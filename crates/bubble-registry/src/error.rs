//! # Registry Error Types
//!
//! Errors for label resolution, the persisted label stores and provider
//! discovery. Uses `thiserror` for diagnostic context.

use std::path::PathBuf;

use bubble_core::{CodecError, ValidationError};
use thiserror::Error;

/// A user-supplied string could not be resolved.
///
/// `field` names the argument the user was filling in, so the message reads
/// "`contract` is invalid: foo" rather than a bare parse error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", describe(.field, .input))]
pub struct ResolutionError {
    /// Descriptive name of the argument being resolved.
    pub field: String,
    /// The input that failed to resolve.
    pub input: String,
}

impl ResolutionError {
    /// Build an error for `field` with the rejected `input`.
    pub fn new(field: &str, input: &str) -> Self {
        Self {
            field: field.to_string(),
            input: input.to_string(),
        }
    }
}

fn describe(field: &str, input: &str) -> String {
    if input.is_empty() {
        format!("`{field}` is missing")
    } else {
        format!("`{field}` is invalid: {input}")
    }
}

/// Errors reading or mutating a label store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// An entry with that label already exists.
    #[error("{kind} with that label already exists: {label}")]
    DuplicateLabel {
        /// Store entry kind, e.g. "address".
        kind: &'static str,
        /// The conflicting label.
        label: String,
    },

    /// A server with that url already exists.
    #[error("server with that url already exists: {0}")]
    DuplicateUrl(String),

    /// No entry with that label.
    #[error("{kind} does not exist with that label: {label}")]
    UnknownLabel {
        /// Store entry kind, e.g. "address".
        kind: &'static str,
        /// The missing label.
        label: String,
    },

    /// Labels must be non-empty.
    #[error("label must not be empty")]
    EmptyLabel,

    /// The label is reserved and cannot be changed.
    #[error("cannot modify the {0}")]
    ProtectedLabel(String),

    /// Server url does not parse.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Reading or writing the store file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The store file.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The store file is not valid JSON for its entry type.
    #[error("malformed store file {}: {source}", .path.display())]
    Json {
        /// The store file.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },

    /// An entry value failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A DID given as an address could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Errors completing a short DID.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The contract's provider hash is not in the known-provider table.
    #[error("unknown provider hash {0}")]
    UnknownProviderHash(String),

    /// The external provider-hash lookup failed.
    #[error("provider lookup failed: {0}")]
    Lookup(String),

    /// The input was not a Bubble DID.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_error_names_field() {
        let err = ResolutionError::new("contract", "nope");
        assert_eq!(format!("{err}"), "`contract` is invalid: nope");
    }

    #[test]
    fn resolution_error_missing_input() {
        let err = ResolutionError::new("file", "");
        assert_eq!(format!("{err}"), "`file` is missing");
    }

    #[test]
    fn store_error_messages() {
        let dup = StoreError::DuplicateLabel {
            kind: "address",
            label: "alice".to_string(),
        };
        assert_eq!(format!("{dup}"), "address with that label already exists: alice");
        let missing = StoreError::UnknownLabel {
            kind: "server",
            label: "bob".to_string(),
        };
        assert_eq!(format!("{missing}"), "server does not exist with that label: bob");
    }
}
