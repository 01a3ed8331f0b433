use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::ports::catalog::{Credential, CredentialProvider, TokenIssuer};

/// Credential provider backed by the JSON config file.
///
/// The config is held behind an async mutex that stays locked while a new
/// token is requested, so concurrent callers share a single refresh.
/// Every refreshed token is written back to the config file.
pub struct ConfigCredentialProvider {
    config_path: PathBuf,
    state: Mutex<Config>,
    issuer: Arc<dyn TokenIssuer>,
}

impl ConfigCredentialProvider {
    pub fn new(config_path: PathBuf, config: Config, issuer: Arc<dyn TokenIssuer>) -> Self {
        Self {
            config_path,
            state: Mutex::new(config),
            issuer,
        }
    }
}

#[async_trait::async_trait]
impl CredentialProvider for ConfigCredentialProvider {
    async fn valid_credential(&self) -> Result<Credential> {
        let mut config = self.state.lock().await;

        let cached = config.credential();
        if cached.is_valid_at(Utc::now()) {
            log::debug!("Using cached access token");
            return Ok(cached);
        }

        log::info!("Getting new access token");
        let fresh = self
            .issuer
            .issue(&config.client_id, &config.client_secret)
            .await?;

        config.set_credential(&fresh);
        config.persist(&self.config_path).await?;
        log::debug!("Access token valid until {}", fresh.expires_at);

        Ok(fresh)
    }

    async fn invalidate(&self) {
        let mut config = self.state.lock().await;
        config.token.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatcherError;
    use crate::ports::catalog::MockTokenIssuer;
    use chrono::Duration;

    fn config_with_token(token: &str, expires_in: Duration) -> Config {
        Config {
            client_id: "id".into(),
            client_secret: "secret".into(),
            token: token.into(),
            expire_time: Utc::now() + expires_in,
            ..Config::default()
        }
    }

    fn fresh_credential(token: &str) -> Credential {
        Credential {
            token: token.into(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn test_valid_token_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let mut issuer = MockTokenIssuer::new();
        issuer.expect_issue().times(0);

        let provider = ConfigCredentialProvider::new(
            dir.path().join("config.json"),
            config_with_token("cached", Duration::minutes(30)),
            Arc::new(issuer),
        );

        let credential = provider.valid_credential().await.unwrap();
        assert_eq!(credential.token, "cached");
        // Nothing was refreshed, so nothing was written
        assert!(!dir.path().join("config.json").exists());
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut issuer = MockTokenIssuer::new();
        issuer
            .expect_issue()
            .withf(|id, secret| id == "id" && secret == "secret")
            .times(1)
            .returning(|_, _| Ok(fresh_credential("fresh")));

        let provider = ConfigCredentialProvider::new(
            path.clone(),
            config_with_token("stale", -Duration::minutes(1)),
            Arc::new(issuer),
        );

        let credential = provider.valid_credential().await.unwrap();
        assert_eq!(credential.token, "fresh");

        let saved = Config::from_file(&path).unwrap();
        assert_eq!(saved.token, "fresh");
        assert_eq!(saved.client_id, "id");

        // Second call uses the cache
        assert_eq!(provider.valid_credential().await.unwrap().token, "fresh");
    }

    #[tokio::test]
    async fn test_missing_token_is_refreshed() {
        let dir = tempfile::tempdir().unwrap();
        let mut issuer = MockTokenIssuer::new();
        issuer
            .expect_issue()
            .times(1)
            .returning(|_, _| Ok(fresh_credential("first")));

        let provider = ConfigCredentialProvider::new(
            dir.path().join("config.json"),
            config_with_token("", Duration::hours(1)),
            Arc::new(issuer),
        );

        assert_eq!(provider.valid_credential().await.unwrap().token, "first");
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let mut issuer = MockTokenIssuer::new();
        issuer
            .expect_issue()
            .times(1)
            .returning(|_, _| Ok(fresh_credential("replacement")));

        let provider = ConfigCredentialProvider::new(
            dir.path().join("config.json"),
            config_with_token("revoked", Duration::hours(1)),
            Arc::new(issuer),
        );

        assert_eq!(provider.valid_credential().await.unwrap().token, "revoked");
        provider.invalidate().await;
        assert_eq!(
            provider.valid_credential().await.unwrap().token,
            "replacement"
        );
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let mut issuer = MockTokenIssuer::new();
        issuer
            .expect_issue()
            .times(1)
            .returning(|_, _| Ok(fresh_credential("shared")));

        let provider = Arc::new(ConfigCredentialProvider::new(
            dir.path().join("config.json"),
            config_with_token("", Duration::zero()),
            Arc::new(issuer),
        ));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let provider = provider.clone();
                tokio::spawn(async move { provider.valid_credential().await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().token, "shared");
        }
    }

    #[tokio::test]
    async fn test_issuer_failure_is_propagated() {
        let dir = tempfile::tempdir().unwrap();
        let mut issuer = MockTokenIssuer::new();
        issuer.expect_issue().times(1).returning(|_, _| {
            Err(MatcherError::Auth {
                reason: "invalid_client".into(),
            })
        });

        let provider = ConfigCredentialProvider::new(
            dir.path().join("config.json"),
            config_with_token("", Duration::zero()),
            Arc::new(issuer),
        );

        assert!(provider.valid_credential().await.unwrap_err().is_auth());
    }
}
