//! Client configuration.
//!
//! Built in code or loaded from environment variables:
//!
//! | Variable                  | Field        | Default                 |
//! |---------------------------|--------------|-------------------------|
//! | `HUSH_SERVER_URL`         | `base_url`   | `http://localhost:8080` |
//! | `HUSH_ACCEPT_LEGACY_URLS` | `url_format` | canonical only          |
//! | `HUSH_TIMEOUT_SECS`       | `timeout`    | none                    |

use std::env;
use std::time::Duration;

use ::url::Url;
use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::url::{self as secret_url, UrlFormat};

/// Server used when nothing else is configured
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

// Parsing a constant; covered by `test_default_server_url_is_a_plain_origin`
static DEFAULT_BASE_URL: Lazy<Url> =
    Lazy::new(|| Url::parse(DEFAULT_SERVER_URL).expect("DEFAULT_SERVER_URL parses"));

/// Configuration for a [`SecretClient`](crate::client::SecretClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    /// Which secret URL shapes `receive` accepts.
    pub url_format: UrlFormat,
    /// Sent as the `User-Agent` header.
    pub user_agent: String,
    /// Whole-request timeout. Off unless set.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.clone(),
            url_format: UrlFormat::Canonical,
            user_agent: default_user_agent(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Configuration for the server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Load configuration from `HUSH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("HUSH_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let mut config = Self::new(&base_url)?;

        if let Some(value) = lookup("HUSH_ACCEPT_LEGACY_URLS") {
            if parse_flag(&value)? {
                config.url_format = UrlFormat::Legacy;
            }
        }

        if let Some(value) = lookup("HUSH_TIMEOUT_SECS") {
            let secs: u64 = value.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("HUSH_TIMEOUT_SECS: '{}' is not a number", value))
            })?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Accept legacy hashless links.
    pub fn with_url_format(mut self, format: UrlFormat) -> Self {
        self.url_format = format;
        self
    }

    /// Abort requests that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Server that stores ciphertext. Secret URLs are built on it.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `base_url` without a trailing slash, ready for path concatenation.
    pub fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Where new secrets are posted.
    pub fn send_endpoint(&self) -> String {
        format!("{}/api/v1/secret", self.base())
    }
}

fn parse_base_url(input: &str) -> Result<Url> {
    let url = Url::parse(input.trim())
        .map_err(|e| Error::InvalidConfig(format!("server URL '{}': {}", input, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidConfig(format!(
            "server URL '{}' must use http or https",
            input
        )));
    }
    if !secret_url::is_plain_origin(&url) {
        return Err(Error::InvalidConfig(format!(
            "server URL '{}' must be a plain origin",
            input
        )));
    }
    Ok(url)
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::InvalidConfig(format!(
            "HUSH_ACCEPT_LEGACY_URLS: '{}' is not a boolean",
            other
        ))),
    }
}

fn default_user_agent() -> String {
    format!("hush-core/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base(), "http://localhost:8080");
        assert_eq!(config.url_format, UrlFormat::Canonical);
        assert!(config.timeout.is_none());
        assert!(config.user_agent.starts_with("hush-core/"));
    }

    #[test]
    fn test_default_server_url_is_a_plain_origin() {
        assert!(parse_base_url(DEFAULT_SERVER_URL).is_ok());
        assert_eq!(ClientConfig::default().base_url(), &*DEFAULT_BASE_URL);
    }

    #[test]
    fn test_secret_urls_built_on_config_parse() {
        let config = ClientConfig::new("https://hush.example:8443/").unwrap();
        let key = "q83vEjRWeJC6zN7wEjRWeJC6zN7wEjRWeJC6zN7wEjQ";
        let hash = crate::crypto::ContentHash::compute(&crate::crypto::SystemCrypto, b"x");

        let built = crate::url::SecretUrl::build(config.base(), "abc", key, &hash).unwrap();
        let parsed = crate::url::SecretUrl::parse(&built.to_string()).unwrap();
        assert_eq!(parsed.base(), "https://hush.example:8443");
    }

    #[test]
    fn test_new_validates() {
        let config = ClientConfig::new("https://hush.example/").unwrap();
        assert_eq!(config.send_endpoint(), "https://hush.example/api/v1/secret");

        assert!(matches!(
            ClientConfig::new("hush.example"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ClientConfig::new("ftp://hush.example"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(ClientConfig::new("https://hush.example/#frag").is_err());
        assert!(ClientConfig::new("https://hush.example/api").is_err());
    }

    #[test]
    fn test_from_lookup() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("HUSH_SERVER_URL", "https://hush.example"),
            ("HUSH_ACCEPT_LEGACY_URLS", "true"),
            ("HUSH_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.base(), "https://hush.example");
        assert_eq!(config.url_format, UrlFormat::Legacy);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_from_lookup_defaults_and_errors() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base(), DEFAULT_SERVER_URL);

        let zero = ClientConfig::from_lookup(lookup(&[("HUSH_TIMEOUT_SECS", "0")])).unwrap();
        assert!(zero.timeout.is_none());

        assert!(ClientConfig::from_lookup(lookup(&[("HUSH_TIMEOUT_SECS", "soon")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[("HUSH_ACCEPT_LEGACY_URLS", "maybe")])).is_err());
    }
}
