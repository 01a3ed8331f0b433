use chrono::{DateTime, Utc};

use crate::error::Result;

/// Decoupled representation of one catalog search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub primary_artist: String,
    pub title: String,
    pub uri: String,
}

/// Bearer token and the instant it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl Credential {
    /// An empty token, or one whose expiry is not in the future, is unusable.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && self.expires_at > now
    }
}

/// Port trait for the catalog search used by the batch runner.
///
/// Implementations live in `services::catalog` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Candidates for `query`, in the service's rank order.
    async fn search(&self, query: &str, credential: &Credential) -> Result<Vec<Candidate>>;
}

/// Supplies a currently valid bearer credential.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn valid_credential(&self) -> Result<Credential>;
    /// Forget the cached credential so the next call fetches a new one.
    async fn invalidate(&self);
}

/// Exchanges client credentials for a fresh bearer credential.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self, client_id: &str, client_secret: &str) -> Result<Credential>;
}
