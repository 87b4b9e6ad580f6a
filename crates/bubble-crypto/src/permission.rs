//! # Permission Hashes
//!
//! The key under which a storage contract's `setPermissions` records access
//! to a file: `keccak256(contract ‖ fileId)`, where the contract is its 20
//! bytes and the file id is taken at its natural width (20 or 32 bytes).
//! For a directory path the directory id is used, since permissions apply
//! to the directory as a whole.

use bubble_core::{Address, FileRef};

use crate::keccak::keccak256;

/// Permission key for `file` under `contract`.
pub fn permission_hash(contract: &Address, file: &FileRef) -> [u8; 32] {
    let mut data = Vec::with_capacity(Address::LENGTH + 32);
    data.extend_from_slice(contract.as_bytes());
    data.extend_from_slice(file.id().as_bytes());
    keccak256(&data)
}

/// [`permission_hash`] as `0x`-prefixed hex.
pub fn permission_hash_hex(contract: &Address, file: &FileRef) -> String {
    format!("0x{}", hex::encode(permission_hash(contract, file)))
}
