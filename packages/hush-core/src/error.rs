//! # Error Handling
//!
//! This module provides the error taxonomy for Hush Core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Validation Errors (raised before any crypto or network work)     │
//! │  │   ├── InvalidToken          - Auth token has the wrong shape        │
//! │  │   ├── Missing/InvalidSecretKey                                      │
//! │  │   ├── Missing/InvalidHash                                           │
//! │  │   ├── Missing/InvalidSecretId                                       │
//! │  │   ├── Missing/InvalidEncryptedData                                  │
//! │  │   ├── InvalidTtl, InvalidIp, InvalidCountryCode, InvalidAsn         │
//! │  │   ├── InvalidPassphraseHash, EmptyPassphrase, EmptyPayload          │
//! │  │   └── InvalidUrl, InvalidBase64, InvalidPayload, InvalidConfig      │
//! │  │                                                                      │
//! │  ├── Crypto Errors (always fatal for the attempt)                     │
//! │  │   ├── EncryptionFailed      - AEAD seal failed                      │
//! │  │   ├── DecryptionFailed      - Wrong key, tampered or truncated      │
//! │  │   ├── HashMismatch          - Plaintext does not match URL hash     │
//! │  │   └── RngFailed             - OS randomness unavailable             │
//! │  │                                                                      │
//! │  ├── Transport Errors (surfaced as-is, never retried)                 │
//! │  │   ├── AuthenticationRequired (401)                                  │
//! │  │   ├── Forbidden              (403)                                  │
//! │  │   ├── PayloadTooLarge        (413)                                  │
//! │  │   ├── NotSupported           (501)                                  │
//! │  │   ├── SecretNotFound         (404)                                  │
//! │  │   ├── SecretAlreadyAccessed  (410)                                  │
//! │  │   ├── SendFailed / RetrieveFailed (any other status)                │
//! │  │   └── Transport, InvalidResponse                                    │
//! │  │                                                                      │
//! │  └── Internal Errors                                                   │
//! │      ├── Serialization                                                 │
//! │      └── Deserialization                                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Codes For Consumers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ERROR HANDLING FLOW                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Internal (Rust)              Consumer Boundary         UI / CLI       │
//! │  ──────────────────────────────────────────────────────────────────     │
//! │                                                                         │
//! │  Result<T, Error>  ──────►  ErrorInfo { code,    ──────►  localized     │
//! │                               message, status }           string        │
//! │                                                                         │
//! │  Example:                                                              │
//! │  Err(Error::SecretAlreadyAccessed) → { code: 505, status: 410, .. }   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reusing a consumed [`SecretEnvelope`](crate::crypto::SecretEnvelope) is a
//! compile error, so there is no runtime variant for it.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for Hush Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Hush Core
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Validation Errors (100-199)
    // ========================================================================

    /// Authentication token has the wrong shape
    #[error("Invalid authentication token: {0}")]
    InvalidToken(String),

    /// No decryption key was supplied
    #[error("Missing decryption key.")]
    MissingSecretKey,

    /// Decryption key has the wrong shape or length
    #[error("Invalid decryption key: {0}")]
    InvalidSecretKey(String),

    /// The secret URL carries no content hash
    #[error("Missing content hash.")]
    MissingHash,

    /// Content hash has the wrong shape
    #[error("Invalid content hash: {0}")]
    InvalidHash(String),

    /// No secret id was supplied
    #[error("Missing secret id.")]
    MissingSecretId,

    /// Secret id has the wrong shape
    #[error("Invalid secret id: {0}")]
    InvalidSecretId(String),

    /// No ciphertext was supplied
    #[error("Missing encrypted data.")]
    MissingEncryptedData,

    /// Ciphertext has the wrong shape
    #[error("Invalid encrypted data: {0}")]
    InvalidEncryptedData(String),

    /// Expiry is not a positive whole number of seconds
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// Not an IP address or CIDR block
    #[error("Invalid IP address or CIDR: {0}")]
    InvalidIp(String),

    /// Not a two-letter uppercase country code
    #[error("Invalid country code: {0}")]
    InvalidCountryCode(String),

    /// ASN outside 1..=4294967295
    #[error("Invalid ASN: {0}")]
    InvalidAsn(String),

    /// Passphrase hash is not 64 hex characters
    #[error("Invalid passphrase hash: {0}")]
    InvalidPassphraseHash(String),

    /// An empty passphrase cannot gate a secret
    #[error("Passphrase must not be empty.")]
    EmptyPassphrase,

    /// Nothing to send
    #[error("Secret content must not be empty.")]
    EmptyPayload,

    /// Secret URL could not be parsed
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    /// Base64 alphabet or length is wrong
    #[error("Invalid base64: {0}")]
    InvalidBase64(String),

    /// Payload record is malformed
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Client configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Crypto Errors (300-399)
    // ========================================================================

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed. Carries no detail so that wrong keys, tampered tags
    /// and truncated input are indistinguishable.
    #[error("Decryption failed.")]
    DecryptionFailed,

    /// Decrypted content does not match the hash carried in the URL
    #[error("Content hash mismatch: the secret was modified or the link is corrupted.")]
    HashMismatch,

    /// Random number generation failed
    #[error("Random number generation failed")]
    RngFailed,

    // ========================================================================
    // Transport Errors (500-599)
    // ========================================================================

    /// The server requires an authentication token (401)
    #[error("Authentication required.")]
    AuthenticationRequired,

    /// The server rejected the authentication token (403)
    #[error("Invalid or expired authentication token.")]
    Forbidden,

    /// The server refused the ciphertext size (413)
    #[error("Secret is too large for this server.")]
    PayloadTooLarge,

    /// The server does not support a requested feature, e.g. restrictions (501)
    #[error("Feature not supported by this server: {0}")]
    NotSupported(String),

    /// The secret does not exist or has expired (404)
    #[error("Secret not found or expired.")]
    SecretNotFound,

    /// The secret was already retrieved once (410)
    #[error("Secret has already been accessed.")]
    SecretAlreadyAccessed,

    /// Any other non-success status while sending
    #[error("Failed to send secret (HTTP {status}).")]
    SendFailed {
        /// HTTP status returned by the server
        status: u16,
    },

    /// Any other non-success status while retrieving
    #[error("Failed to retrieve secret (HTTP {status}).")]
    RetrieveFailed {
        /// HTTP status returned by the server
        status: u16,
    },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server answered with something this client cannot use
    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    // ========================================================================
    // Internal Errors (900-999)
    // ========================================================================

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl Error {
    /// Stable numeric code, suitable as a localization key.
    ///
    /// - 100-199: Validation
    /// - 300-399: Crypto
    /// - 500-599: Transport
    /// - 900-999: Internal
    pub fn code(&self) -> i32 {
        match self {
            // Validation (100-199)
            Error::InvalidToken(_) => 100,
            Error::MissingSecretKey => 101,
            Error::InvalidSecretKey(_) => 102,
            Error::MissingHash => 103,
            Error::InvalidHash(_) => 104,
            Error::MissingSecretId => 105,
            Error::InvalidSecretId(_) => 106,
            Error::MissingEncryptedData => 107,
            Error::InvalidEncryptedData(_) => 108,
            Error::InvalidTtl(_) => 109,
            Error::InvalidIp(_) => 110,
            Error::InvalidCountryCode(_) => 111,
            Error::InvalidAsn(_) => 112,
            Error::InvalidPassphraseHash(_) => 113,
            Error::EmptyPassphrase => 114,
            Error::EmptyPayload => 115,
            Error::InvalidUrl(_) => 116,
            Error::InvalidBase64(_) => 117,
            Error::InvalidPayload(_) => 118,
            Error::InvalidConfig(_) => 119,

            // Crypto (300-399)
            Error::EncryptionFailed(_) => 300,
            Error::DecryptionFailed => 301,
            Error::HashMismatch => 302,
            Error::RngFailed => 303,

            // Transport (500-599)
            Error::AuthenticationRequired => 500,
            Error::Forbidden => 501,
            Error::PayloadTooLarge => 502,
            Error::NotSupported(_) => 503,
            Error::SecretNotFound => 504,
            Error::SecretAlreadyAccessed => 505,
            Error::SendFailed { .. } => 506,
            Error::RetrieveFailed { .. } => 507,
            Error::Transport(_) => 508,
            Error::InvalidResponse(_) => 509,

            // Internal (900-999)
            Error::Serialization(_) => 900,
            Error::Deserialization(_) => 901,
        }
    }

    /// HTTP status the server answered with, when the error came from one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::AuthenticationRequired => Some(401),
            Error::Forbidden => Some(403),
            Error::PayloadTooLarge => Some(413),
            Error::NotSupported(_) => Some(501),
            Error::SecretNotFound => Some(404),
            Error::SecretAlreadyAccessed => Some(410),
            Error::SendFailed { status } | Error::RetrieveFailed { status } => Some(*status),
            _ => None,
        }
    }

    /// Validation errors are raised before any work is done, so the call can
    /// be repeated once the input is corrected.
    pub fn is_validation(&self) -> bool {
        (100..200).contains(&self.code())
    }

    /// Crypto errors end the attempt; no partial plaintext is ever returned.
    pub fn is_fatal(&self) -> bool {
        (300..400).contains(&self.code())
    }

    /// Map a non-success status from `POST /api/v1/secret`.
    pub(crate) fn from_send_status(status: u16, body: &str) -> Self {
        match status {
            401 => Error::AuthenticationRequired,
            403 => Error::Forbidden,
            413 => Error::PayloadTooLarge,
            501 => Error::NotSupported(if body.trim().is_empty() {
                "restrictions".to_string()
            } else {
                body.trim().to_string()
            }),
            status => Error::SendFailed { status },
        }
    }

    /// Map a non-success status from `GET /api/v1/secret/{id}`.
    pub(crate) fn from_retrieve_status(status: u16) -> Self {
        match status {
            404 => Error::SecretNotFound,
            410 => Error::SecretAlreadyAccessed,
            status => Error::RetrieveFailed { status },
        }
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // reqwest errors may embed the request URL; ours never carry a
        // fragment, but strip it anyway so nothing secret reaches a log.
        Error::Transport(err.without_url().to_string())
    }
}

// ============================================================================
// CONSUMER ERROR REPRESENTATION
// ============================================================================

/// Serializable error representation for UI and CLI consumers
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Numeric error code
    pub code: i32,
    /// Human-readable error message
    pub message: String,
    /// HTTP status, if the server produced the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<&Error> for ErrorInfo {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            status: err.http_status(),
        }
    }
}

impl From<Error> for ErrorInfo {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

// ============================================================================
// TESTS
// ============================================================================
