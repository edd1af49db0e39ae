//! Authorization for outbound API calls.

pub mod credentials;

pub use credentials::{
    AccessToken, CredentialProvider, ServiceAccountCredentials, ServiceAccountKey,
    StaticCredentials, BUSINESS_MESSAGES_SCOPE,
};
