//! # Cryptography Module
//!
//! All cryptographic primitives used by Hush Core.
//!
//! ## Security Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CRYPTOGRAPHIC ARCHITECTURE                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 ENCRYPTION SCHEME                               │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  Secret Encryption (AES-256-GCM)                               │   │
//! │  │  ───────────────────────────────                                │   │
//! │  │                                                                 │   │
//! │  │  • 256-bit key, random per secret                              │   │
//! │  │  • 96-bit nonce, random per encryption                         │   │
//! │  │  • 128-bit authentication tag                                  │   │
//! │  │  • No associated data                                          │   │
//! │  │                                                                 │   │
//! │  │  Wire = base64( nonce || AES-GCM(key, nonce, plaintext) )      │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 INTEGRITY                                       │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  ContentHash = SHA-256(plaintext)[..16], base64url (22 chars)  │   │
//! │  │  Passphrase  = hex(SHA-256(passphrase)), sent instead of it    │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Considerations
//!
//! 1. **Key Erasure**: Keys and nonces are overwritten when dropped
//! 2. **Single Use**: Envelopes are consumed by the one operation they perform
//! 3. **Secure Random**: `rand::rngs::OsRng` through [`SystemCrypto`]
//! 4. **Uniform Failures**: Every decryption failure is the same error
//! 5. **No Page Locking**: Key pages can still be swapped out by the OS;
//!    processes that need that guarantee must lock memory themselves

mod envelope;
mod erase;
mod hash;
mod keys;
mod provider;

pub use envelope::{SealedSecret, SecretEnvelope};
pub use erase::secure_erase;
pub use hash::{hash_passphrase, ContentHash, CONTENT_HASH_SIZE};
pub use keys::{Nonce, SecretKey};
pub use provider::{CryptoProvider, SystemCrypto};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Size of the encryption key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;
