//! Access tokens for the Business Messages API.
//!
//! Service accounts authorize with the OAuth 2.0 JWT bearer grant: a JWT
//! signed with the account's RSA key is exchanged for a short-lived access
//! token. The token is memoized and shared by every caller until it nears
//! expiry.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::CredentialError;

/// OAuth scope required by the Business Messages API.
pub const BUSINESS_MESSAGES_SCOPE: &str = "https://www.googleapis.com/auth/businessmessages";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Refresh tokens this long before they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Lifetime requested for the signed assertion.
const ASSERTION_TTL_SECS: u64 = 3600;

/// A bearer token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Source of access tokens for outbound calls.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Return the cached token, authorizing first if there is none or it is
    /// about to expire.
    async fn get_or_refresh(&self) -> Result<AccessToken, CredentialError>;
}

/// Fixed token, for local development against a stub API and for tests.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    token: AccessToken,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(token),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn get_or_refresh(&self) -> Result<AccessToken, CredentialError> {
        Ok(self.token.clone())
    }
}

/// Fields of a service account JSON key that authorization needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, CredentialError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CredentialError::KeyFile {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_TTL_SECS
}

struct CachedToken {
    token: AccessToken,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + EXPIRY_MARGIN < self.expires_at
    }
}

/// Service account provider with a memoized access token.
///
/// The key file is read on the first authorization, not at construction,
/// so a missing file only fails the outbound call that needed it.
pub struct ServiceAccountCredentials {
    http: Client,
    key_path: PathBuf,
    cache: Mutex<Option<CachedToken>>,
}

impl ServiceAccountCredentials {
    pub fn new(http: Client, key_path: impl Into<PathBuf>) -> Self {
        Self {
            http,
            key_path: key_path.into(),
            cache: Mutex::new(None),
        }
    }

    async fn authorize(&self) -> Result<CachedToken, CredentialError> {
        let key = ServiceAccountKey::from_file(&self.key_path)?;
        let assertion = sign_assertion(&key, unix_now())?;

        info!(client_email = %key.client_email, "credentials_authorizing");

        let response = self
            .http
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| CredentialError::Exchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status_code = status.as_u16(), body = %body, "credentials_exchange_rejected");
            return Err(CredentialError::Exchange(format!("{}: {}", status, body)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CredentialError::Exchange(e.to_string()))?;

        info!(expires_in_seconds = token.expires_in, "credentials_authorized");

        Ok(CachedToken {
            token: AccessToken::new(token.access_token),
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}

#[async_trait]
impl CredentialProvider for ServiceAccountCredentials {
    async fn get_or_refresh(&self) -> Result<AccessToken, CredentialError> {
        // Held across the exchange so concurrent callers wait for one authorization.
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if cached.is_fresh(Instant::now()) {
                return Ok(cached.token.clone());
            }
        }

        let fresh = self.authorize().await?;
        let token = fresh.token.clone();
        *cache = Some(fresh);
        Ok(token)
    }
}

/// Build the RS256 assertion for the JWT bearer grant.
fn sign_assertion(key: &ServiceAccountKey, now: u64) -> Result<String, CredentialError> {
    let claims = Claims {
        iss: &key.client_email,
        scope: BUSINESS_MESSAGES_SCOPE,
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_TTL_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
    Ok(jsonwebtoken::encode(&header, &claims, &encoding_key)?)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
