//! # Hush Core
//!
//! Zero-knowledge one-time secret sharing. Secrets are encrypted on the
//! client; the server only ever stores ciphertext and deletes it after one
//! retrieval.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          HUSH CORE MODULES                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                       SecretClient                              │   │
//! │  │             send(payload) ──► URL    receive(URL) ──► payload   │   │
//! │  └───────┬──────────────┬──────────────┬──────────────┬───────────┘   │
//! │          │              │              │              │               │
//! │  ┌───────▼─────┐ ┌──────▼──────┐ ┌─────▼───────┐ ┌────▼──────────┐    │
//! │  │   Crypto    │ │     URL     │ │   Payload   │ │ Restrictions  │    │
//! │  │             │ │             │ │             │ │               │    │
//! │  │ - Envelope  │ │ - Parse     │ │ - Wire JSON │ │ - IP / CIDR   │    │
//! │  │ - Hash      │ │ - Build     │ │ - Sniffing  │ │ - Country     │    │
//! │  │ - Erasure   │ │ - Formats   │ │             │ │ - ASN, pass   │    │
//! │  └─────────────┘ └─────────────┘ └─────────────┘ └───────────────┘    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │       Codec  ·  Validation  ·  Config  ·  Error taxonomy        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error taxonomy with stable codes
//! - [`codec`] - Chunked base64 and base64url
//! - [`crypto`] - Envelope, content hash, key erasure, crypto provider
//! - [`validation`] - Checkers for every externally supplied value
//! - [`payload`] - Secret content and its wire record
//! - [`restrictions`] - Server-enforced access conditions
//! - [`url`](crate::url) - Secret URL parsing and assembly
//! - [`config`] - Client configuration
//! - [`client`] - The send/receive protocol
//!
//! ## Security Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          SECURITY LAYERS                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Confidentiality (AES-256-GCM)                                         │
//! │  ─────────────────────────────                                          │
//! │  A fresh key per secret. The key travels only in the URL fragment,     │
//! │  which browsers and this client never send to the server.              │
//! │                                                                         │
//! │  Integrity (AEAD tag + content hash)                                   │
//! │  ───────────────────────────────────                                    │
//! │  The tag rejects tampered ciphertext; the truncated SHA-256 in the     │
//! │  fragment rejects a swapped ciphertext that decrypts cleanly.          │
//! │                                                                         │
//! │  One-time access (server)                                              │
//! │  ────────────────────────                                               │
//! │  The server deletes ciphertext on first retrieval. This client never   │
//! │  retries a retrieval.                                                  │
//! │                                                                         │
//! │  Key hygiene                                                           │
//! │  ───────────                                                            │
//! │  Keys, nonces and plaintext buffers are overwritten when dropped.      │
//! │  Memory is not locked against swapping.                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use hush_core::{ClientConfig, Payload, SecretClient, Ttl};
//!
//! # async fn run() -> hush_core::Result<()> {
//! let client = SecretClient::new(ClientConfig::new("https://hush.example")?)?;
//!
//! let url = client
//!     .send(&Payload::from_text("hunter2"), Ttl::HOUR, None, None)
//!     .await?;
//!
//! let payload = client.receive(&url).await?;
//! assert_eq!(payload.decode()?, "hunter2");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod client;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod payload;
pub mod restrictions;
pub mod sniff;
pub mod url;
pub mod validation;

#[cfg(test)]
mod proptests;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use client::SecretClient;
pub use config::ClientConfig;
pub use crypto::{ContentHash, CryptoProvider, SecretEnvelope, SystemCrypto};
pub use error::{Error, ErrorInfo, Result};
pub use payload::Payload;
pub use restrictions::Restrictions;
pub use sniff::ContentKind;
pub use crate::url::{SecretUrl, UrlFormat};
pub use validation::Ttl;

// ============================================================================
// VERSION INFO
// ============================================================================

/// Returns the version of Hush Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================
