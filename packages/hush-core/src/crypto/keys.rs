//! # Key Material
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          KEY TYPES                                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SecretKey (AES-256)                                            │   │
//! │  │  ───────────────────                                             │   │
//! │  │                                                                  │   │
//! │  │  • 32 random bytes, fresh for every secret                     │   │
//! │  │  • Heap-allocated once, never resized, never cloned            │   │
//! │  │  • Erased on drop (random, 0xFF, zero)                         │   │
//! │  │  • Leaves the process only inside a URL fragment               │   │
//! │  │                                                                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Nonce (96 bits)                                                │   │
//! │  │  ───────────────                                                 │   │
//! │  │                                                                  │   │
//! │  │  • 12 random bytes per encryption                              │   │
//! │  │  • Prepended to the AEAD output on the wire                    │   │
//! │  │  • Erased on drop like the key                                 │   │
//! │  │                                                                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use super::erase::secure_erase;
use super::provider::CryptoProvider;
use super::{KEY_SIZE, NONCE_SIZE};
use crate::codec;
use crate::error::{Error, Result};

/// A 256-bit secret key.
///
/// The bytes live behind a `Box` so moving the key between owners never
/// leaves a stray copy on the stack.
pub struct SecretKey(Box<[u8; KEY_SIZE]>);

impl SecretKey {
    /// Draw a fresh random key.
    pub fn generate(provider: &dyn CryptoProvider) -> Result<Self> {
        let mut key = Self(Box::new([0u8; KEY_SIZE]));
        provider.fill_random(key.0.as_mut_slice())?;
        Ok(key)
    }

    /// Copy a key from caller-owned bytes. The caller's buffer is not
    /// retained or modified.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(Error::InvalidSecretKey(format!(
                "expected {} bytes, got {}",
                KEY_SIZE,
                bytes.len()
            )));
        }

        let mut key = Self(Box::new([0u8; KEY_SIZE]));
        key.0.copy_from_slice(bytes);
        Ok(key)
    }

    /// Decode the URL-safe base64 form found in a secret URL.
    pub fn from_url_safe(encoded: &str) -> Result<Self> {
        let mut bytes = codec::decode_url_safe(encoded)
            .map_err(|e| Error::InvalidSecretKey(e.to_string()))?;
        let key = Self::from_slice(&bytes);
        secure_erase(&mut bytes);
        key
    }

    /// URL-safe base64 (43 characters).
    pub fn to_url_safe(&self) -> String {
        codec::encode_url_safe(self.0.as_slice())
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        secure_erase(self.0.as_mut_slice());
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

/// A nonce (number used once) for AES-GCM encryption
///
/// **Never reuse a nonce with the same key.** A repeated (key, nonce) pair
/// leaks the XOR of both plaintexts and lets an attacker forge tags. Every
/// nonce here is drawn fresh from the CSPRNG, and the envelope that owns it
/// is consumed by the single encryption it performs.
pub struct Nonce([u8; NONCE_SIZE]);

impl Nonce {
    fn zeroed() -> Self {
        Self([0u8; NONCE_SIZE])
    }

    /// Generate a cryptographically random nonce
    pub fn random(provider: &dyn CryptoProvider) -> Result<Self> {
        let mut nonce = Self::zeroed();
        provider.fill_random(&mut nonce.0)?;
        Ok(nonce)
    }

    /// Read the nonce prefix of a sealed envelope.
    pub fn from_prefix(sealed: &[u8]) -> Option<Self> {
        let prefix: [u8; NONCE_SIZE] = sealed.get(..NONCE_SIZE)?.try_into().ok()?;
        Some(Self(prefix))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

impl Drop for Nonce {
    fn drop(&mut self) {
        secure_erase(&mut self.0);
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Nonce([REDACTED])")
    }
}
