//! # Byte Codec
//!
//! Fixed-width conversions between integers, hex strings, text and byte
//! buffers, plus the base-58 string codec (Bitcoin alphabet, no checksum)
//! used by the `bubble:` URL scheme.
//!
//! All functions are pure. Width handling follows one rule throughout:
//! values are right-aligned into the target buffer, zero-padded on the left
//! when short and truncated from the left when long. Callers that need a
//! strict length check validate before calling; these are primitives, not
//! validators. The one exception is [`uint_to_bytes`], which refuses to drop
//! significant bits and fails with [`ValidationError::ValueOutOfRange`].

use crate::error::{CodecError, ValidationError};

/// Strip an optional `0x`/`0X` prefix.
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Returns true if `s` is non-empty and made only of hex digits.
pub fn is_hex_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Decode hex (with or without `0x`) right-aligned into exactly `length` bytes.
///
/// Odd-length input is read as if it carried one leading `0`, so `"0x2"`
/// decodes to `[0x02]`.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidHex`] if the digits are not hex.
pub fn hex_to_bytes(hex: &str, length: usize) -> Result<Vec<u8>, ValidationError> {
    let decoded = decode_hex(hex)?;
    Ok(right_align(&decoded, length))
}

/// Decode hex (with or without `0x`) at its natural width.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidHex`] if the digits are not hex.
pub fn decode_hex(hex: &str) -> Result<Vec<u8>, ValidationError> {
    let digits = strip_hex_prefix(hex);
    let result = if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}"))
    } else {
        hex::decode(digits)
    };
    result.map_err(|_| ValidationError::InvalidHex(hex.to_string()))
}

/// Lower-case hex, no prefix.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Big-endian encoding of `value` into exactly `length` bytes.
///
/// # Errors
///
/// Returns [`ValidationError::ValueOutOfRange`] if `value` needs more than
/// `length` bytes. High bits are never silently dropped.
pub fn uint_to_bytes(value: u128, length: usize) -> Result<Vec<u8>, ValidationError> {
    let be = value.to_be_bytes();
    let significant = be.len() - (value.leading_zeros() as usize / 8);
    if significant > length {
        return Err(ValidationError::ValueOutOfRange { value, length });
    }
    Ok(right_align(&be[be.len() - significant..], length))
}

/// UTF-8 bytes of `text`, right-aligned into exactly `length` bytes.
pub fn text_to_bytes(text: &str, length: usize) -> Vec<u8> {
    right_align(text.as_bytes(), length)
}

/// Base-58 encode a byte buffer.
///
/// Empty input yields `None`: absence propagates instead of producing an
/// empty string that would later decode to nothing.
pub fn base58_encode(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        None
    } else {
        Some(bs58::encode(bytes).into_string())
    }
}

/// Base-58 decode a string into raw bytes.
///
/// # Errors
///
/// Returns [`CodecError::Base58Decode`] on any non-alphabet character.
pub fn base58_decode(s: &str) -> Result<Vec<u8>, CodecError> {
    bs58::decode(s)
        .into_vec()
        .map_err(|e| CodecError::Base58Decode(format!("\"{s}\": {e}")))
}

/// Base-58 of the minimal big-endian form of `value` (at least one byte).
pub fn uint_to_base58(value: u64) -> String {
    let be = value.to_be_bytes();
    let skip = (value.leading_zeros() as usize / 8).min(be.len() - 1);
    bs58::encode(&be[skip..]).into_string()
}

/// Inverse of [`uint_to_base58`].
///
/// # Errors
///
/// Returns [`CodecError::Base58Decode`] for invalid characters or a value
/// wider than 64 bits.
pub fn base58_to_uint(s: &str) -> Result<u64, CodecError> {
    let bytes = base58_decode(s)?;
    bytes.iter().try_fold(0u64, |acc, &b| {
        acc.checked_mul(256)
            .map(|v| v + u64::from(b))
            .ok_or_else(|| CodecError::Base58Decode(format!("\"{s}\" exceeds 64 bits")))
    })
}

fn right_align(src: &[u8], length: usize) -> Vec<u8> {
    let mut out = vec![0u8; length];
    if src.len() >= length {
        out.copy_from_slice(&src[src.len() - length..]);
    } else {
        out[length - src.len()..].copy_from_slice(src);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_bytes_pads_left() {
        assert_eq!(hex_to_bytes("0x0102", 4).unwrap(), vec![0, 0, 1, 2]);
        assert_eq!(hex_to_bytes("0102", 2).unwrap(), vec![1, 2]);
    }

    #[test]
    fn hex_to_bytes_truncates_left() {
        assert_eq!(hex_to_bytes("0x010203", 2).unwrap(), vec![2, 3]);
    }

    #[test]
    fn hex_to_bytes_odd_length() {
        assert_eq!(hex_to_bytes("0x2", 1).unwrap(), vec![2]);
        assert_eq!(hex_to_bytes("abc", 2).unwrap(), vec![0x0a, 0xbc]);
    }

    #[test]
    fn hex_to_bytes_rejects_non_hex() {
        assert_eq!(
            hex_to_bytes("0xzz", 1),
            Err(ValidationError::InvalidHex("0xzz".to_string()))
        );
    }

    #[test]
    fn bytes_to_hex_is_lowercase_unprefixed() {
        assert_eq!(bytes_to_hex(&[0xde, 0xAD, 0x01]), "dead01");
    }

    #[test]
    fn uint_to_bytes_big_endian() {
        assert_eq!(uint_to_bytes(3, 4).unwrap(), vec![0, 0, 0, 3]);
        assert_eq!(uint_to_bytes(0x0102, 2).unwrap(), vec![1, 2]);
        assert_eq!(uint_to_bytes(0, 0).unwrap(), Vec::<u8>::new());
        assert_eq!(uint_to_bytes(u128::MAX, 32).unwrap()[..16], [0u8; 16]);
    }

    #[test]
    fn uint_to_bytes_fails_when_too_wide() {
        assert_eq!(
            uint_to_bytes(256, 1),
            Err(ValidationError::ValueOutOfRange {
                value: 256,
                length: 1
            })
        );
        assert!(uint_to_bytes(u128::from(u32::MAX) + 1, 4).is_err());
    }

    #[test]
    fn text_to_bytes_right_aligned() {
        assert_eq!(text_to_bytes("ab", 4), vec![0, 0, b'a', b'b']);
        assert_eq!(text_to_bytes("abc", 2), vec![b'b', b'c']);
    }

    #[test]
    fn base58_known_vectors() {
        assert_eq!(base58_encode(b"hello").as_deref(), Some("Cn8eVZg"));
        assert_eq!(base58_encode(&[0, 0, 1]).as_deref(), Some("112"));
        assert_eq!(base58_decode("Cn8eVZg").unwrap(), b"hello".to_vec());
    }

    #[test]
    fn base58_empty_is_absent() {
        assert_eq!(base58_encode(&[]), None);
    }

    #[test]
    fn base58_rejects_non_alphabet() {
        // 0, O, I and l are excluded from the Bitcoin alphabet.
        assert!(matches!(
            base58_decode("0OIl"),
            Err(CodecError::Base58Decode(_))
        ));
    }

    #[test]
    fn uint_base58_zero_is_single_one() {
        assert_eq!(uint_to_base58(0), "1");
        assert_eq!(base58_to_uint("1").unwrap(), 0);
        assert_eq!(base58_to_uint("11").unwrap(), 0);
    }

    #[test]
    fn uint_base58_inverse() {
        for v in [1u64, 57, 58, 255, 256, 65_535, u64::MAX] {
            assert_eq!(base58_to_uint(&uint_to_base58(v)).unwrap(), v);
        }
    }

    #[test]
    fn base58_to_uint_overflow() {
        let wide = bs58::encode([1u8; 9]).into_string();
        assert!(base58_to_uint(&wide).is_err());
    }
}
