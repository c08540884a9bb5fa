//! # Protocol Client
//!
//! Sends and receives one-time secrets against a Hush server.
//!
//! ## Send
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          SEND FLOW                                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Payload, Ttl, token?, restrictions?                                   │
//! │       │                                                                 │
//! │       ▼  validate (nothing touched yet)                                │
//! │  SecretEnvelope::generate()  ──►  key + nonce                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  plaintext = {"data": .., "filename": ..}                              │
//! │  hash      = SHA-256(plaintext)[..16]                                  │
//! │  sealed    = AES-256-GCM(plaintext)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  POST /api/v1/secret { data, expires_in, restrictions? }  ──► { id }   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  {base}/s/{id}#{key}:{hash}                                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Receive
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         RECEIVE FLOW                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  secret URL ──► id, key, hash            (fragment stays local)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  GET /api/v1/secret/{id}  ──► base64 ciphertext (server deletes it)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  decrypt ──► verify hash ──► Payload                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each call makes exactly one HTTP request and never retries: a retried
//! retrieval would find the secret already gone.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::config::ClientConfig;
use crate::crypto::{ContentHash, CryptoProvider, SecretEnvelope, SystemCrypto};
use crate::error::{Error, Result};
use crate::payload::Payload;
use crate::restrictions::Restrictions;
use crate::url::SecretUrl;
use crate::validation::{self, Ttl};

/// Body of `POST /api/v1/secret`
#[derive(Debug, Serialize)]
struct CreateSecretRequest<'a> {
    data: &'a str,
    expires_in: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    restrictions: Option<&'a Restrictions>,
}

/// Response to `POST /api/v1/secret`
#[derive(Debug, Deserialize)]
struct CreateSecretResponse {
    id: String,
}

/// Client for one Hush server.
///
/// Cheap to clone; clones share the connection pool and crypto provider.
#[derive(Clone)]
pub struct SecretClient {
    config: ClientConfig,
    http: reqwest::Client,
    crypto: Arc<dyn CryptoProvider>,
}

impl SecretClient {
    /// Client using the system crypto provider and a fresh connection pool.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self::with_parts(config, http, Arc::new(SystemCrypto)))
    }

    /// Client from caller-supplied parts.
    pub fn with_parts(
        config: ClientConfig,
        http: reqwest::Client,
        crypto: Arc<dyn CryptoProvider>,
    ) -> Self {
        Self {
            config,
            http,
            crypto,
        }
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Encrypt `payload`, upload the ciphertext and return the secret URL.
    ///
    /// An empty or `None` token sends no `Authorization` header. Empty
    /// restrictions are left out of the request.
    pub async fn send(
        &self,
        payload: &Payload,
        ttl: Ttl,
        token: Option<&str>,
        restrictions: Option<&Restrictions>,
    ) -> Result<String> {
        if payload.is_empty() {
            return Err(Error::EmptyPayload);
        }
        let token = token.unwrap_or_default();
        validation::validate_auth_token(token)?;
        let restrictions = restrictions.filter(|r| !r.is_empty());
        if let Some(restrictions) = restrictions {
            restrictions.validate()?;
        }

        let envelope = SecretEnvelope::generate(self.crypto.clone())?;
        let plaintext = payload.to_wire_bytes()?;
        let hash = ContentHash::compute(self.crypto.as_ref(), &plaintext);
        let sealed = envelope.encrypt(&plaintext)?;
        drop(plaintext);

        tracing::debug!(
            ciphertext_len = sealed.ciphertext().len(),
            ttl_secs = ttl.as_secs(),
            restricted = restrictions.is_some(),
            "Uploading secret"
        );

        let body = CreateSecretRequest {
            data: sealed.ciphertext(),
            expires_in: ttl.as_secs(),
            restrictions,
        };

        let mut request = self.http.post(self.config.send_endpoint()).json(&body);
        if !token.is_empty() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Server refused secret");
            return Err(Error::from_send_status(status.as_u16(), &text));
        }

        let created: CreateSecretResponse = serde_json::from_str(&text)
            .map_err(|e| Error::InvalidResponse(format!("create response: {}", e)))?;
        validation::validate_secret_id(&created.id)
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        let key = Zeroizing::new(sealed.key_as_url_safe_base64());
        let url = SecretUrl::build(self.config.base(), &created.id, &key, &hash)?;

        tracing::info!(id = created.id.as_str(), "Secret sent");
        Ok(url.to_string())
    }

    /// Fetch, decrypt and verify the secret behind `secret_url`.
    ///
    /// The server deletes the ciphertext when it is fetched, so a failure
    /// after the request (wrong key, hash mismatch) still uses the secret up.
    pub async fn receive(&self, secret_url: &str) -> Result<Payload> {
        let url = SecretUrl::parse_with(secret_url, self.config.url_format)?;
        let envelope = SecretEnvelope::from_url_key(self.crypto.clone(), url.key())?;

        tracing::debug!(id = url.id(), hashed = url.hash().is_some(), "Retrieving secret");

        let response = self.http.get(url.retrieval_endpoint()).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(id = url.id(), status = status.as_u16(), "Server refused retrieval");
            return Err(Error::from_retrieve_status(status.as_u16()));
        }

        let body = response.text().await?;
        let encrypted = body.trim();
        validation::validate_encrypted_data(encrypted)?;

        let plaintext = envelope.decrypt(encrypted)?;

        if let Some(hash) = url.hash() {
            if let Err(e) = hash.verify(self.crypto.as_ref(), &plaintext) {
                tracing::warn!(id = url.id(), "Content hash mismatch");
                return Err(e);
            }
        }

        let payload = Payload::from_wire_bytes(&plaintext)?;
        tracing::info!(id = url.id(), plaintext_len = plaintext.len(), "Secret received");
        Ok(payload)
    }
}

impl std::fmt::Debug for SecretClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
