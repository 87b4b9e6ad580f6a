//! # Keccak-256
//!
//! Ethereum's Keccak-256 (the pre-standard padding, not FIPS SHA3-256).
//! Every hash that is signed or compared on-chain goes through
//! [`keccak256`].

use sha3::{Digest, Keccak256};

/// Keccak-256 of raw bytes.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Keccak-256 as `0x`-prefixed lower-case hex.
pub fn keccak256_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(keccak256(data)))
}

/// Hash of arbitrary UTF-8 data, as `0x`-prefixed hex.
pub fn data_hash(text: &str) -> String {
    keccak256_hex(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_vector() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn hex_form_is_prefixed() {
        let h = keccak256_hex(b"");
        assert!(h.starts_with("0xc5d246"));
        assert_eq!(h.len(), 66);
    }

    #[test]
    fn data_hash_is_text_keccak() {
        assert_eq!(data_hash(""), keccak256_hex(b""));
        assert_ne!(data_hash("a"), data_hash("b"));
    }
}
