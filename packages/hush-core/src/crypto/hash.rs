//! Content and passphrase hashing.
//!
//! The content hash is an end-to-end check: it is computed over the
//! plaintext before encryption and verified after decryption, so it catches
//! a wrong or swapped ciphertext even when the AEAD tag is valid for it.

use std::fmt;

use zeroize::Zeroizing;

use super::provider::CryptoProvider;
use crate::codec;
use crate::error::{Error, Result};
use crate::validation;

/// Bytes of SHA-256 kept in the content hash
pub const CONTENT_HASH_SIZE: usize = 16;

/// First 16 bytes of SHA-256 over a secret's plaintext, kept in its
/// 22-character URL-safe form.
///
/// Hashes are compared by their encoded form, so any altered character in
/// a URL is a mismatch even where base64 would decode it to the same bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct ContentHash(String);

impl ContentHash {
    /// Hash `plaintext`.
    pub fn compute(provider: &dyn CryptoProvider, plaintext: &[u8]) -> Self {
        let digest = provider.sha256(plaintext);
        Self(codec::encode_url_safe(&digest[..CONTENT_HASH_SIZE]))
    }

    /// Accept the 22-character form carried in a secret URL.
    pub fn parse(encoded: &str) -> Result<Self> {
        validation::validate_hash(encoded)?;
        Ok(Self(encoded.to_string()))
    }

    /// URL-safe base64 without padding (22 characters).
    pub fn as_url_safe(&self) -> &str {
        &self.0
    }

    /// Check `plaintext` against this hash.
    pub fn verify(&self, provider: &dyn CryptoProvider, plaintext: &[u8]) -> Result<()> {
        if Self::compute(provider, plaintext) == *self {
            Ok(())
        } else {
            Err(Error::HashMismatch)
        }
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContentHash([REDACTED])")
    }
}

/// Lower-case hex SHA-256 of a passphrase.
///
/// Only this digest is ever sent to the server. The passphrase is copied
/// into a buffer that is wiped when this function returns.
pub fn hash_passphrase(provider: &dyn CryptoProvider, passphrase: &str) -> Result<String> {
    if passphrase.is_empty() {
        return Err(Error::EmptyPassphrase);
    }

    let bytes = Zeroizing::new(passphrase.as_bytes().to_vec());
    Ok(hex::encode(provider.sha256(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SystemCrypto;

    #[test]
    fn test_hash_is_22_chars() {
        let hash = ContentHash::compute(&SystemCrypto, b"hello");
        assert_eq!(hash.as_url_safe().len(), 22);
        assert_eq!(ContentHash::parse(hash.as_url_safe()).unwrap(), hash);
    }

    #[test]
    fn test_hash_is_sha256_prefix() {
        let hash = ContentHash::compute(&SystemCrypto, b"abc");
        // SHA-256("abc") = ba7816bf8f01cfea414140de5dae2223...
        let bytes = crate::codec::decode_url_safe(hash.as_url_safe()).unwrap();
        assert_eq!(hex::encode(bytes), "ba7816bf8f01cfea414140de5dae2223");
    }

    #[test]
    fn test_verify_detects_change() {
        let hash = ContentHash::compute(&SystemCrypto, b"original");
        assert!(hash.verify(&SystemCrypto, b"original").is_ok());
        assert!(matches!(
            hash.verify(&SystemCrypto, b"modified"),
            Err(Error::HashMismatch)
        ));
    }

    #[test]
    fn test_single_character_change_is_a_mismatch() {
        let hash = ContentHash::compute(&SystemCrypto, b"payload");
        let mut altered = hash.as_url_safe().to_string();
        let last = if altered.ends_with('A') { "B" } else { "A" };
        altered.replace_range(21.., last);

        let altered = ContentHash::parse(&altered).unwrap();
        assert!(matches!(
            altered.verify(&SystemCrypto, b"payload"),
            Err(Error::HashMismatch)
        ));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let hash = ContentHash::compute(&SystemCrypto, b"payload");
        let debug = format!("{:?}", hash);
        assert!(!debug.contains(hash.as_url_safe()));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_parse_rejects_full_hex_digest() {
        let full = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        assert!(matches!(ContentHash::parse(full), Err(Error::InvalidHash(_))));
    }

    #[test]
    fn test_passphrase_hash() {
        let hashed = hash_passphrase(&SystemCrypto, "abc").unwrap();
        assert_eq!(
            hashed,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(matches!(
            hash_passphrase(&SystemCrypto, ""),
            Err(Error::EmptyPassphrase)
        ));
    }
}
