//! # Input Validation
//!
//! One checker per externally supplied value. Every check runs before any
//! cryptographic or network work, so a validation error never costs the
//! caller a one-time secret.
//!
//! ```text
//! ┌────────────────────┬─────────────────────────────────┬──────────────────────┐
//! │ Value              │ Accepted shape                  │ Errors               │
//! ├────────────────────┼─────────────────────────────────┼──────────────────────┤
//! │ auth token         │ "" or 43 base64url chars        │ InvalidToken         │
//! │ secret key         │ 43 base64url chars              │ Missing/Invalid      │
//! │ content hash       │ 22 base64url chars              │ Missing/Invalid      │
//! │ secret id          │ [A-Za-z0-9-]{1,128}             │ Missing/Invalid      │
//! │ encrypted data     │ base64, > nonce + tag           │ Missing/Invalid      │
//! │ ttl                │ whole seconds > 0               │ InvalidTtl           │
//! │ ip                 │ IPv4/IPv6 literal or CIDR       │ InvalidIp            │
//! │ country            │ [A-Z]{2}                        │ InvalidCountryCode   │
//! │ asn                │ 1..=4294967295                  │ InvalidAsn           │
//! │ passphrase hash    │ 64 hex chars                    │ InvalidPassphraseHash│
//! └────────────────────┴─────────────────────────────────┴──────────────────────┘
//! ```

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::{self, url_safe_len};
use crate::crypto::{CONTENT_HASH_SIZE, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
use crate::error::{Error, Result};
use crate::restrictions::Restrictions;

/// Raw bytes in a server-issued authentication token
pub const AUTH_TOKEN_BYTES: usize = 32;

/// Longest secret id this client accepts
pub const MAX_SECRET_ID_LEN: usize = 128;

/// Characters in a hex SHA-256 digest
pub const PASSPHRASE_HASH_LEN: usize = 64;

/// Check an authentication token. Empty means anonymous and is accepted.
pub fn validate_auth_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Ok(());
    }

    let expected = url_safe_len(AUTH_TOKEN_BYTES);
    if token.len() != expected || !codec::is_url_safe_base64(token) {
        return Err(Error::InvalidToken(format!(
            "expected {} base64url characters",
            expected
        )));
    }
    Ok(())
}

/// Check the URL-safe form of a 256-bit key.
pub fn validate_secret_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::MissingSecretKey);
    }

    let expected = url_safe_len(KEY_SIZE);
    if key.len() != expected || !codec::is_url_safe_base64(key) {
        return Err(Error::InvalidSecretKey(format!(
            "expected {} base64url characters",
            expected
        )));
    }
    Ok(())
}

/// Check the URL-safe form of a truncated content hash.
pub fn validate_hash(hash: &str) -> Result<()> {
    if hash.is_empty() {
        return Err(Error::MissingHash);
    }

    let expected = url_safe_len(CONTENT_HASH_SIZE);
    if hash.len() != expected || !codec::is_url_safe_base64(hash) {
        return Err(Error::InvalidHash(format!(
            "expected {} base64url characters",
            expected
        )));
    }
    Ok(())
}

/// Check a server-assigned secret id.
pub fn validate_secret_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::MissingSecretId);
    }

    if id.len() > MAX_SECRET_ID_LEN {
        return Err(Error::InvalidSecretId(format!(
            "longer than {} characters",
            MAX_SECRET_ID_LEN
        )));
    }

    if !id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
        return Err(Error::InvalidSecretId(
            "expected only A-Z, a-z, 0-9 and '-'".into(),
        ));
    }
    Ok(())
}

/// Check ciphertext as served by the server: standard base64 long enough to
/// hold more than a nonce and a tag.
pub fn validate_encrypted_data(data: &str) -> Result<()> {
    if data.is_empty() {
        return Err(Error::MissingEncryptedData);
    }

    if !codec::is_standard_base64(data) || data.len() % 4 != 0 {
        return Err(Error::InvalidEncryptedData("not base64".into()));
    }

    let padding = data.len() - data.trim_end_matches('=').len();
    let decoded_len = data.len() / 4 * 3 - padding;
    if decoded_len <= NONCE_SIZE + TAG_SIZE {
        return Err(Error::InvalidEncryptedData("too short".into()));
    }
    Ok(())
}

/// Check an IPv4/IPv6 address or CIDR block.
pub fn validate_ip(value: &str) -> Result<()> {
    let (addr, prefix) = match value.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (value, None),
    };

    let addr: IpAddr = addr
        .parse()
        .map_err(|_| Error::InvalidIp(value.to_string()))?;

    if let Some(prefix) = prefix {
        let max = if addr.is_ipv4() { 32 } else { 128 };
        let bits: u8 = prefix
            .parse()
            .map_err(|_| Error::InvalidIp(value.to_string()))?;
        // u8::from_str also takes "+8" and "08", neither of which is CIDR
        let canonical = !prefix.starts_with('+') && (prefix == "0" || !prefix.starts_with('0'));
        if bits > max || !canonical {
            return Err(Error::InvalidIp(value.to_string()));
        }
    }
    Ok(())
}

/// Check an ISO 3166-1 alpha-2 country code in upper case.
pub fn validate_country_code(code: &str) -> Result<()> {
    if code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(Error::InvalidCountryCode(code.to_string()))
    }
}

/// Check an autonomous system number. 0 is reserved and rejected.
pub fn validate_asn(asn: u64) -> Result<u32> {
    match u32::try_from(asn) {
        Ok(0) => Err(Error::InvalidAsn("0 is reserved".into())),
        Ok(asn) => Ok(asn),
        Err(_) => Err(Error::InvalidAsn(format!("{} exceeds 4294967295", asn))),
    }
}

/// Check a hex SHA-256 passphrase digest.
pub fn validate_passphrase_hash(hash: &str) -> Result<()> {
    if hash.len() == PASSPHRASE_HASH_LEN && hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(Error::InvalidPassphraseHash(format!(
            "expected {} hex characters",
            PASSPHRASE_HASH_LEN
        )))
    }
}

/// Check every populated field of a restriction set.
pub fn validate_restrictions(restrictions: &Restrictions) -> Result<()> {
    if let Some(ips) = &restrictions.allowed_ips {
        ips.iter().try_for_each(|ip| validate_ip(ip))?;
    }
    if let Some(countries) = &restrictions.allowed_countries {
        countries
            .iter()
            .try_for_each(|code| validate_country_code(code))?;
    }
    if let Some(asns) = &restrictions.allowed_asns {
        asns.iter()
            .try_for_each(|&asn| validate_asn(u64::from(asn)).map(|_| ()))?;
    }
    if let Some(hash) = &restrictions.passphrase_hash {
        validate_passphrase_hash(hash)?;
    }
    Ok(())
}

// ============================================================================
// TTL
// ============================================================================

/// Secret lifetime in whole seconds, always at least 1.
///
/// There is no client-side maximum; the server applies its own policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Ttl(u64);

impl Ttl {
    /// One hour
    pub const HOUR: Ttl = Ttl(3600);

    /// One day
    pub const DAY: Ttl = Ttl(86_400);

    /// One week
    pub const WEEK: Ttl = Ttl(604_800);

    /// Validate a signed seconds count.
    pub fn new(seconds: i64) -> Result<Self> {
        if seconds <= 0 {
            return Err(Error::InvalidTtl(format!(
                "{} is not a positive number of seconds",
                seconds
            )));
        }
        Ok(Self(seconds as u64))
    }

    /// Seconds until expiry
    pub fn as_secs(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for Ttl {
    type Error = Error;

    fn try_from(seconds: u64) -> Result<Self> {
        if seconds == 0 {
            return Err(Error::InvalidTtl("0 is not a positive number of seconds".into()));
        }
        Ok(Self(seconds))
    }
}

impl TryFrom<f64> for Ttl {
    type Error = Error;

    /// Numbers from loosely typed sources (JSON, JS bridges) must still be
    /// whole, finite and positive.
    fn try_from(seconds: f64) -> Result<Self> {
        if !seconds.is_finite() || seconds.fract() != 0.0 || seconds < 1.0 {
            return Err(Error::InvalidTtl(format!(
                "{} is not a positive whole number of seconds",
                seconds
            )));
        }
        if seconds >= u64::MAX as f64 {
            return Err(Error::InvalidTtl(format!("{} is out of range", seconds)));
        }
        Ok(Self(seconds as u64))
    }
}

impl From<Ttl> for u64 {
    fn from(ttl: Ttl) -> Self {
        ttl.0
    }
}

impl FromStr for Ttl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let seconds: u64 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidTtl(format!("'{}' is not a whole number of seconds", s)))?;
        Self::try_from(seconds)
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

// ============================================================================
// TESTS
// ============================================================================
