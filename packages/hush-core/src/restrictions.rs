//! # Access Restrictions
//!
//! Conditions the server checks before it releases a secret. The client only
//! models and validates them; enforcement is entirely server-side.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      RESTRICTION SET                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  allowed_ips        ["10.0.0.0/8", "2001:db8::1"]                      │
//! │  allowed_countries  ["US", "DE"]                                       │
//! │  allowed_asns       [13335]                                            │
//! │  passphrase_hash    hex(SHA-256(passphrase))                           │
//! │                                                                         │
//! │  Absent fields are left out of the request body entirely.             │
//! │  The passphrase itself never leaves the client.                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::crypto::{self, SystemCrypto};
use crate::error::Result;
use crate::validation;

/// Server-enforced access conditions for one secret
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restrictions {
    /// IP addresses or CIDR blocks allowed to retrieve the secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_ips: Option<Vec<String>>,

    /// Upper-case ISO 3166-1 alpha-2 country codes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_countries: Option<Vec<String>>,

    /// Autonomous system numbers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_asns: Option<Vec<u32>>,

    /// Lower-case hex SHA-256 of the passphrase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passphrase_hash: Option<String>,
}

impl Restrictions {
    /// No restrictions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow an IP address or CIDR block.
    pub fn allow_ip(mut self, ip: impl Into<String>) -> Self {
        self.allowed_ips.get_or_insert_with(Vec::new).push(ip.into());
        self
    }

    /// Allow a country.
    pub fn allow_country(mut self, code: impl Into<String>) -> Self {
        self.allowed_countries
            .get_or_insert_with(Vec::new)
            .push(code.into());
        self
    }

    /// Allow an autonomous system.
    pub fn allow_asn(mut self, asn: u32) -> Self {
        self.allowed_asns.get_or_insert_with(Vec::new).push(asn);
        self
    }

    /// Require a passphrase. Only its hash is kept.
    pub fn with_passphrase(mut self, passphrase: &str) -> Result<Self> {
        self.passphrase_hash = Some(hash_passphrase(passphrase)?);
        Ok(self)
    }

    /// True if no field is populated.
    ///
    /// An empty list still counts as populated; whether it admits anyone is
    /// for the server to decide.
    pub fn is_empty(&self) -> bool {
        self.allowed_ips.is_none()
            && self.allowed_countries.is_none()
            && self.allowed_asns.is_none()
            && self.passphrase_hash.is_none()
    }

    /// Check every populated field.
    pub fn validate(&self) -> Result<()> {
        validation::validate_restrictions(self)
    }
}

/// Lower-case hex SHA-256 of `passphrase`, using the system provider.
pub fn hash_passphrase(passphrase: &str) -> Result<String> {
    crypto::hash_passphrase(&SystemCrypto, passphrase)
}
