//! # Base64 Codec
//!
//! URL-safe (no padding) base64 for keys and hashes carried in the URL
//! fragment, and standard (padded) base64 for payload data and ciphertext.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          CHUNKED ENCODING                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  input:  [ 6 KiB ][ 6 KiB ][ 6 KiB ][ tail ]                           │
//! │              │        │        │       │                                │
//! │              ▼        ▼        ▼       ▼                                │
//! │  output: [ 8 KiB ][ 8 KiB ][ 8 KiB ][ tail + padding ]                 │
//! │                                                                         │
//! │  The chunk size is a multiple of 3, so every chunk but the last        │
//! │  encodes to whole 4-character groups and the pieces concatenate        │
//! │  into exactly the single-shot encoding.                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};

use crate::error::{Error, Result};

/// Input bytes processed per encoding step (8 KiB of output)
pub const ENCODE_CHUNK_SIZE: usize = 3 * 2048;

/// Encode bytes as URL-safe base64 without padding.
pub fn encode_url_safe(bytes: &[u8]) -> String {
    encode_chunked(&URL_SAFE_NO_PAD, bytes)
}

/// Decode URL-safe base64, with or without the trailing padding stripped.
///
/// The alphabet is checked first so that characters from the standard
/// alphabet (`+`, `/`) are reported instead of silently misdecoded.
pub fn decode_url_safe(encoded: &str) -> Result<Vec<u8>> {
    if !is_url_safe_base64(encoded) {
        return Err(Error::InvalidBase64(
            "expected only A-Z, a-z, 0-9, '-' and '_'".into(),
        ));
    }

    URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| Error::InvalidBase64(e.to_string()))
}

/// Encode bytes as standard, padded base64.
pub fn encode_standard(bytes: &[u8]) -> String {
    encode_chunked(&STANDARD, bytes)
}

/// Decode standard, padded base64.
pub fn decode_standard(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| Error::InvalidBase64(e.to_string()))
}

/// `[A-Za-z0-9_-]*`
pub fn is_url_safe_base64(s: &str) -> bool {
    s.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// `[A-Za-z0-9+/]*={0,2}`
pub fn is_standard_base64(s: &str) -> bool {
    let body = s.trim_end_matches('=');
    s.len() - body.len() <= 2
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}

/// Length of the URL-safe, unpadded encoding of `len` bytes.
pub const fn url_safe_len(len: usize) -> usize {
    (len * 4 + 2) / 3
}

fn encode_chunked<E: base64::Engine>(engine: &E, bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(ENCODE_CHUNK_SIZE) {
        engine.encode_string(chunk, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_safe_alphabet_substitution() {
        // 0xfb 0xff encodes to "+/8" in the standard alphabet
        assert_eq!(encode_standard(&[0xfb, 0xff]), "+/8=");
        assert_eq!(encode_url_safe(&[0xfb, 0xff]), "-_8");
    }

    #[test]
    fn test_empty_round_trip() {
        assert_eq!(encode_url_safe(b""), "");
        assert_eq!(decode_url_safe("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_chunked_matches_single_shot() {
        let data: Vec<u8> = (0..(ENCODE_CHUNK_SIZE * 3 + 17))
            .map(|i| (i % 251) as u8)
            .collect();

        assert_eq!(encode_standard(&data), STANDARD.encode(&data));
        assert_eq!(encode_url_safe(&data), URL_SAFE_NO_PAD.encode(&data));
    }

    #[test]
    fn test_decode_rejects_standard_alphabet() {
        let err = decode_url_safe("ab+/").unwrap_err();
        assert!(matches!(err, Error::InvalidBase64(_)));
    }

    #[test]
    fn test_decode_rejects_padding_char() {
        assert!(decode_url_safe("YQ==").is_err());
    }

    #[test]
    fn test_decode_rejects_impossible_length() {
        // A single trailing character can never be produced by an encoder
        assert!(matches!(decode_url_safe("a"), Err(Error::InvalidBase64(_))));
    }

    #[test]
    fn test_url_safe_len() {
        assert_eq!(url_safe_len(32), 43);
        assert_eq!(url_safe_len(16), 22);
        assert_eq!(url_safe_len(0), 0);
    }

    #[test]
    fn test_standard_alphabet_predicate() {
        assert!(is_standard_base64("aGVsbG8="));
        assert!(is_standard_base64("a+/b"));
        assert!(!is_standard_base64("a-_b"));
        assert!(!is_standard_base64("abc==="));
    }
}
