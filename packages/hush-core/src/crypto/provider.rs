//! # Crypto Capabilities
//!
//! The narrow set of primitives the protocol needs, behind one trait so the
//! core never reaches for a platform global.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CryptoProvider                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  fill_random(buf)                 - CSPRNG bytes (keys, nonces)        │
//! │  aead_encrypt(key, nonce, pt)     - AES-256-GCM seal, no AAD           │
//! │  aead_decrypt(key, nonce, ct)     - AES-256-GCM open, no AAD           │
//! │  sha256(data)                     - content and passphrase hashing     │
//! │                                                                         │
//! │  SystemCrypto: aes-gcm + sha2 + OsRng                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce as AesNonce,
};
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::{KEY_SIZE, NONCE_SIZE};
use crate::error::{Error, Result};

/// Cryptographic primitives used by the protocol.
///
/// Implementations must be safe to share between concurrent calls; the
/// protocol itself holds no lock around them.
pub trait CryptoProvider: Send + Sync {
    /// Fill `buf` with cryptographically secure random bytes.
    fn fill_random(&self, buf: &mut [u8]) -> Result<()>;

    /// Seal `plaintext`, returning `ciphertext || tag`.
    fn aead_encrypt(
        &self,
        key: &[u8; KEY_SIZE],
        nonce: &[u8; NONCE_SIZE],
        plaintext: &[u8],
    ) -> Result<Vec<u8>>;

    /// Open `ciphertext || tag`. Every failure is [`Error::DecryptionFailed`].
    fn aead_decrypt(
        &self,
        key: &[u8; KEY_SIZE],
        nonce: &[u8; NONCE_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>>;

    /// SHA-256 digest of `data`.
    fn sha256(&self, data: &[u8]) -> [u8; 32];
}

/// Default provider backed by `aes-gcm`, `sha2` and the OS RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCrypto;

impl CryptoProvider for SystemCrypto {
    fn fill_random(&self, buf: &mut [u8]) -> Result<()> {
        rand::rngs::OsRng
            .try_fill_bytes(buf)
            .map_err(|_| Error::RngFailed)
    }

    fn aead_encrypt(
        &self,
        key: &[u8; KEY_SIZE],
        nonce: &[u8; NONCE_SIZE],
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| Error::EncryptionFailed(format!("Invalid key: {}", e)))?;

        cipher
            .encrypt(AesNonce::from_slice(nonce), plaintext)
            .map_err(|e| Error::EncryptionFailed(e.to_string()))
    }

    fn aead_decrypt(
        &self,
        key: &[u8; KEY_SIZE],
        nonce: &[u8; NONCE_SIZE],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| Error::DecryptionFailed)?;

        cipher
            .decrypt(AesNonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::DecryptionFailed)
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aead_round_trip() {
        let crypto = SystemCrypto;
        let key = [42u8; KEY_SIZE];
        let nonce = [7u8; NONCE_SIZE];

        let sealed = crypto.aead_encrypt(&key, &nonce, b"Hello, World!").unwrap();
        assert_eq!(sealed.len(), 13 + super::super::TAG_SIZE);

        let opened = crypto.aead_decrypt(&key, &nonce, &sealed).unwrap();
        assert_eq!(opened, b"Hello, World!");
    }

    #[test]
    fn test_wrong_nonce_fails() {
        let crypto = SystemCrypto;
        let key = [42u8; KEY_SIZE];

        let sealed = crypto.aead_encrypt(&key, &[1u8; NONCE_SIZE], b"data").unwrap();
        let result = crypto.aead_decrypt(&key, &[2u8; NONCE_SIZE], &sealed);

        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_sha256_known_vector() {
        let digest = SystemCrypto.sha256(b"abc");
        assert_eq!(
            hex::encode(digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_fill_random_is_not_constant() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        SystemCrypto.fill_random(&mut a).unwrap();
        SystemCrypto.fill_random(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
