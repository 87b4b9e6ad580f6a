//! # EIP-55 Checksum Casing
//!
//! Mixed-case address rendering where the case of each hex letter encodes
//! one bit of the Keccak-256 hash of the lower-case address.

use bubble_core::Address;

use crate::keccak::keccak256;

/// Render an address with EIP-55 checksum casing.
pub fn to_checksum_address(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let hash = keccak256(lower.as_bytes());
    let digits: String = lower
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let shift = if i % 2 == 0 { 4 } else { 0 };
            let nibble = (hash[i / 2] >> shift) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect();
    format!("0x{digits}")
}

/// Returns true if `s` is an address whose casing matches its EIP-55 checksum.
///
/// All-lower and all-upper addresses carry no checksum and are not accepted.
pub fn is_checksum_address(s: &str) -> bool {
    Address::parse(s).is_ok_and(|a| to_checksum_address(&a) == s)
}
