//! Error types shared by the outbound client and the credential provider.

use thiserror::Error;

/// Failure to obtain an access token for the Business Messages API.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to read service account key {path}: {source}")]
    KeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid service account key: {0}")]
    KeyFormat(#[from] serde_json::Error),
    #[error("failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("token exchange failed: {0}")]
    Exchange(String),
}

/// Failure of a single outbound call to the messaging platform.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("api returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid api url: {0}")]
    Url(#[from] url::ParseError),
}
