//! # Secret URLs
//!
//! Parsing and assembly of the link handed to a recipient.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SECRET URL                                       │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  https://hush.example/s/3f2b9c1e-8d7a#<key: 43 chars>:<hash: 22 chars> │
//! │  └──────── base ────┘   └── id ───┘  └────────── fragment ──────────┘  │
//! │                                                                         │
//! │  • base + path go to the server when retrieving                        │
//! │  • the fragment never leaves the client                                │
//! │                                                                         │
//! │  Canonical: fragment is "key:hash", hash required                      │
//! │  Legacy:    fragment may be just "key"; a hash, if present, is checked │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parsing stops at the first failure, in this order: not an absolute URL,
//! path not `/s/{id}`, no fragment, then the id, key and hash themselves.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::crypto::ContentHash;
use crate::error::{Error, Result};
use crate::validation;

/// Path segment that introduces the secret id
pub const SECRET_PATH_PREFIX: &str = "s";

/// Which fragment shapes a parser accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlFormat {
    /// `#key:hash`, hash required
    #[default]
    Canonical,
    /// `#key` or `#key:hash`; links made before content hashes were added
    Legacy,
}

/// A parsed or freshly assembled secret URL
#[derive(Clone)]
pub struct SecretUrl {
    base: String,
    id: String,
    key: Zeroizing<String>,
    hash: Option<ContentHash>,
}

impl SecretUrl {
    /// Parse a canonical secret URL.
    pub fn parse(input: &str) -> Result<Self> {
        Self::parse_with(input, UrlFormat::Canonical)
    }

    /// Parse a secret URL, accepting the shapes allowed by `format`.
    pub fn parse_with(input: &str, format: UrlFormat) -> Result<Self> {
        let parsed =
            ::url::Url::parse(input.trim()).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            return Err(Error::InvalidUrl("expected an http(s) URL with a host".into()));
        }

        let id = match parsed
            .path_segments()
            .map(|segments| segments.collect::<Vec<_>>())
            .as_deref()
        {
            Some([SECRET_PATH_PREFIX, id]) if !id.is_empty() => id.to_string(),
            _ => return Err(Error::MissingSecretId),
        };

        let fragment = match parsed.fragment() {
            Some(fragment) if !fragment.is_empty() => Zeroizing::new(fragment.to_string()),
            _ => return Err(Error::MissingSecretKey),
        };

        let (key, hash) = match fragment.split_once(':') {
            Some((key, hash)) => (key, Some(hash)),
            None => (fragment.as_str(), None),
        };

        validation::validate_secret_id(&id)?;
        validation::validate_secret_key(key)?;

        let hash = match (hash, format) {
            (Some(hash), _) => Some(ContentHash::parse(hash)?),
            (None, UrlFormat::Canonical) => return Err(Error::MissingHash),
            (None, UrlFormat::Legacy) => None,
        };

        Ok(Self {
            base: parsed.origin().ascii_serialization(),
            id,
            key: Zeroizing::new(key.to_string()),
            hash,
        })
    }

    /// Assemble a canonical URL on `base`, which must be a bare http(s)
    /// origin such as `https://hush.example` so the result parses again.
    pub fn build(base: &str, id: &str, key: &str, hash: &ContentHash) -> Result<Self> {
        let parsed =
            ::url::Url::parse(base.trim()).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        if !is_plain_origin(&parsed) {
            return Err(Error::InvalidUrl(format!(
                "base '{}' must be an http(s) origin without a path",
                base
            )));
        }
        validation::validate_secret_id(id)?;
        validation::validate_secret_key(key)?;

        Ok(Self {
            base: parsed.origin().ascii_serialization(),
            id: id.to_string(),
            key: Zeroizing::new(key.to_string()),
            hash: Some(hash.clone()),
        })
    }

    /// Scheme, host and port the secret lives on
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Server-assigned secret id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// URL-safe base64 decryption key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Content hash, absent only for legacy links
    pub fn hash(&self) -> Option<&ContentHash> {
        self.hash.as_ref()
    }

    /// Where the ciphertext is fetched from. Never includes the fragment.
    pub fn retrieval_endpoint(&self) -> String {
        format!("{}/api/v1/secret/{}", self.base, self.id)
    }
}

/// True for `http(s)://host[:port]` with nothing after it but an optional `/`.
pub(crate) fn is_plain_origin(url: &::url::Url) -> bool {
    matches!(url.scheme(), "http" | "https")
        && url.has_host()
        && url.path() == "/"
        && url.query().is_none()
        && url.fragment().is_none()
}

impl fmt::Display for SecretUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}#{}",
            self.base,
            SECRET_PATH_PREFIX,
            self.id,
            self.key.as_str()
        )?;
        if let Some(hash) = &self.hash {
            write!(f, ":{}", hash)?;
        }
        Ok(())
    }
}

impl fmt::Debug for SecretUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretUrl")
            .field("base", &self.base)
            .field("id", &self.id)
            .field("key", &"[REDACTED]")
            .field("hash", &self.hash.is_some())
            .finish()
    }
}
