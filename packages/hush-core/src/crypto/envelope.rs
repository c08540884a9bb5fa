//! # Secret Envelope
//!
//! Single-use AES-256-GCM context: one key, one operation.
//!
//! ## Encryption Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SEND (seal)                                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  SecretEnvelope::generate()                                            │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  key   = 32 random bytes                                    │       │
//! │  │  nonce = 12 random bytes                                    │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                         │                                               │
//! │                         ▼  encrypt(self, plaintext)   (consumes)       │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  AES-256-GCM(key, nonce, plaintext, aad = none)             │       │
//! │  │           ↓                                                  │       │
//! │  │  base64( nonce || ciphertext || tag )                       │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  SealedSecret { ciphertext, key }  ──► key goes into the URL fragment  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RECEIVE (open)                                   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  SecretEnvelope::from_url_key(fragment key)   (nonce not yet known)    │
//! │                         │                                               │
//! │                         ▼  decrypt(self, base64)      (consumes)       │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  nonce = first 12 bytes                                     │       │
//! │  │  AES-256-GCM-Open(key, nonce, rest)                         │       │
//! │  │           ↓                                                  │       │
//! │  │  Plaintext, or DecryptionFailed (never partial output)     │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `encrypt` and `decrypt` take the envelope by value, so a key/nonce pair
//! can be used for at most one operation. Calling `encrypt` twice does not
//! compile:
//!
//! ```compile_fail
//! use std::sync::Arc;
//! use hush_core::crypto::{SecretEnvelope, SystemCrypto};
//!
//! let envelope = SecretEnvelope::generate(Arc::new(SystemCrypto)).unwrap();
//! let first = envelope.encrypt(b"one");
//! let second = envelope.encrypt(b"two");
//! ```

use std::sync::Arc;

use zeroize::Zeroizing;

use super::keys::{Nonce, SecretKey};
use super::provider::CryptoProvider;
use super::{NONCE_SIZE, TAG_SIZE};
use crate::codec;
use crate::error::{Error, Result};

/// One key bound to one encryption or decryption
pub struct SecretEnvelope {
    provider: Arc<dyn CryptoProvider>,
    key: SecretKey,
    /// Drawn at construction when generating; read from the ciphertext when
    /// decrypting.
    nonce: Option<Nonce>,
}

impl SecretEnvelope {
    /// Fresh random key and nonce, ready to encrypt.
    pub fn generate(provider: Arc<dyn CryptoProvider>) -> Result<Self> {
        let key = SecretKey::generate(provider.as_ref())?;
        let nonce = Nonce::random(provider.as_ref())?;

        Ok(Self {
            provider,
            key,
            nonce: Some(nonce),
        })
    }

    /// Envelope around an existing 32-byte key. The bytes are copied.
    pub fn from_key(provider: Arc<dyn CryptoProvider>, key: &[u8]) -> Result<Self> {
        Ok(Self {
            provider,
            key: SecretKey::from_slice(key)?,
            nonce: None,
        })
    }

    /// Envelope around the URL-safe key found in a secret URL fragment.
    pub fn from_url_key(provider: Arc<dyn CryptoProvider>, encoded: &str) -> Result<Self> {
        Ok(Self {
            provider,
            key: SecretKey::from_url_safe(encoded)?,
            nonce: None,
        })
    }

    /// The key in the form placed in secret URLs.
    pub fn key_as_url_safe_base64(&self) -> String {
        self.key.to_url_safe()
    }

    /// Encrypt `plaintext`, consuming the envelope.
    ///
    /// Output is standard base64 of `nonce || ciphertext || tag`. The key is
    /// handed back inside the [`SealedSecret`] so the caller can place it in
    /// the URL; it is erased when that value is dropped.
    pub fn encrypt(mut self, plaintext: &[u8]) -> Result<SealedSecret> {
        let nonce = match self.nonce.take() {
            Some(nonce) => nonce,
            None => Nonce::random(self.provider.as_ref())?,
        };

        let sealed = self
            .provider
            .aead_encrypt(self.key.as_bytes(), nonce.as_bytes(), plaintext)?;

        let mut wire = Vec::with_capacity(NONCE_SIZE + sealed.len());
        wire.extend_from_slice(nonce.as_bytes());
        wire.extend_from_slice(&sealed);

        tracing::debug!(plaintext_len = plaintext.len(), sealed_len = wire.len(), "Sealed secret");

        Ok(SealedSecret {
            ciphertext: codec::encode_standard(&wire),
            key: self.key,
        })
    }

    /// Decrypt standard base64 `nonce || ciphertext || tag`, consuming the
    /// envelope.
    ///
    /// Malformed base64, truncated input, a wrong key and a tampered tag all
    /// produce the same [`Error::DecryptionFailed`].
    pub fn decrypt(self, encrypted: &str) -> Result<Zeroizing<Vec<u8>>> {
        let wire = codec::decode_standard(encrypted).map_err(|_| Error::DecryptionFailed)?;
        if wire.len() < NONCE_SIZE + TAG_SIZE {
            return Err(Error::DecryptionFailed);
        }

        let nonce = Nonce::from_prefix(&wire).ok_or(Error::DecryptionFailed)?;
        let plaintext = self.provider.aead_decrypt(
            self.key.as_bytes(),
            nonce.as_bytes(),
            &wire[NONCE_SIZE..],
        )?;

        Ok(Zeroizing::new(plaintext))
    }

    /// Drop the envelope now. Key and nonce are erased either way.
    pub fn dispose(self) {}
}

impl std::fmt::Debug for SecretEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretEnvelope")
            .field("key", &self.key)
            .field("nonce", &self.nonce)
            .finish_non_exhaustive()
    }
}

/// Result of [`SecretEnvelope::encrypt`]
#[derive(Debug)]
pub struct SealedSecret {
    ciphertext: String,
    key: SecretKey,
}

impl SealedSecret {
    /// Standard base64 of `nonce || ciphertext || tag`
    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    /// The key in the form placed in secret URLs.
    pub fn key_as_url_safe_base64(&self) -> String {
        self.key.to_url_safe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{SystemCrypto, KEY_SIZE};

    fn provider() -> Arc<dyn CryptoProvider> {
        Arc::new(SystemCrypto)
    }

    /// Hands out a fixed byte pattern instead of randomness.
    struct FixedRandom(u8);

    impl CryptoProvider for FixedRandom {
        fn fill_random(&self, buf: &mut [u8]) -> Result<()> {
            buf.fill(self.0);
            Ok(())
        }

        fn aead_encrypt(
            &self,
            key: &[u8; KEY_SIZE],
            nonce: &[u8; NONCE_SIZE],
            plaintext: &[u8],
        ) -> Result<Vec<u8>> {
            SystemCrypto.aead_encrypt(key, nonce, plaintext)
        }

        fn aead_decrypt(
            &self,
            key: &[u8; KEY_SIZE],
            nonce: &[u8; NONCE_SIZE],
            ciphertext: &[u8],
        ) -> Result<Vec<u8>> {
            SystemCrypto.aead_decrypt(key, nonce, ciphertext)
        }

        fn sha256(&self, data: &[u8]) -> [u8; 32] {
            SystemCrypto.sha256(data)
        }
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let sealed = SecretEnvelope::generate(provider())
            .unwrap()
            .encrypt(b"Hello, World!")
            .unwrap();

        let opened = SecretEnvelope::from_url_key(provider(), &sealed.key_as_url_safe_base64())
            .unwrap()
            .decrypt(sealed.ciphertext())
            .unwrap();

        assert_eq!(opened.as_slice(), b"Hello, World!");
    }

    #[test]
    fn test_wire_format_is_nonce_prefixed() {
        let sealed = SecretEnvelope::generate(Arc::new(FixedRandom(0x5A)))
            .unwrap()
            .encrypt(b"abc")
            .unwrap();

        let wire = codec::decode_standard(sealed.ciphertext()).unwrap();
        assert_eq!(wire.len(), NONCE_SIZE + 3 + TAG_SIZE);
        assert_eq!(&wire[..NONCE_SIZE], &[0x5A; NONCE_SIZE]);
    }

    #[test]
    fn test_each_envelope_draws_a_new_nonce() {
        let a = SecretEnvelope::from_key(provider(), &[1u8; KEY_SIZE])
            .unwrap()
            .encrypt(b"same")
            .unwrap();
        let b = SecretEnvelope::from_key(provider(), &[1u8; KEY_SIZE])
            .unwrap()
            .encrypt(b"same")
            .unwrap();

        assert_ne!(a.ciphertext(), b.ciphertext());
    }

    #[test]
    fn test_from_key_rejects_wrong_length() {
        let result = SecretEnvelope::from_key(provider(), &[0u8; 16]);
        assert!(matches!(result, Err(Error::InvalidSecretKey(_))));
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = SecretEnvelope::from_key(provider(), &[1u8; KEY_SIZE])
            .unwrap()
            .encrypt(b"secret")
            .unwrap();

        let result = SecretEnvelope::from_key(provider(), &[2u8; KEY_SIZE])
            .unwrap()
            .decrypt(sealed.ciphertext());

        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_tampered_tag_fails() {
        let sealed = SecretEnvelope::from_key(provider(), &[1u8; KEY_SIZE])
            .unwrap()
            .encrypt(b"secret")
            .unwrap();

        let mut wire = codec::decode_standard(sealed.ciphertext()).unwrap();
        let last = wire.len() - 1;
        wire[last] ^= 0x01;

        let result = SecretEnvelope::from_key(provider(), &[1u8; KEY_SIZE])
            .unwrap()
            .decrypt(&codec::encode_standard(&wire));

        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_truncated_and_garbage_input_fail_uniformly() {
        for input in ["", "AAAA", "not base64!", "QUFBQUFBQUFBQUFBQUFBQUFBQUFBQUFB"] {
            let result = SecretEnvelope::from_key(provider(), &[1u8; KEY_SIZE])
                .unwrap()
                .decrypt(input);
            assert!(matches!(result, Err(Error::DecryptionFailed)), "input {:?}", input);
        }
    }

    #[test]
    fn test_key_survives_into_sealed_secret() {
        let envelope = SecretEnvelope::generate(provider()).unwrap();
        let key = envelope.key_as_url_safe_base64();
        let sealed = envelope.encrypt(b"x").unwrap();

        assert_eq!(sealed.key_as_url_safe_base64(), key);
        assert_eq!(key.len(), 43);
    }

    #[test]
    fn test_dispose() {
        let envelope = SecretEnvelope::generate(provider()).unwrap();
        envelope.dispose();
    }

    #[test]
    fn test_debug_redacts_key() {
        let envelope = SecretEnvelope::from_key(provider(), &[0x41u8; KEY_SIZE]).unwrap();
        let printed = format!("{:?}", envelope);
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains(&envelope.key_as_url_safe_base64()));
    }
}
