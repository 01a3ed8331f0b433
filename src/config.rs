use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MatcherError, Result};
use crate::ports::catalog::Credential;
use crate::spotify_rs::{SPOTIFY_API_BASE_URL, SPOTIFY_TOKEN_URL};

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Client credentials plus the cached access token.
///
/// Files written by earlier versions used Go-style keys (`ClientID`,
/// `ExpireTime`, ...); those are still accepted when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, alias = "ClientID")]
    pub client_id: String,
    #[serde(default, alias = "ClientSecret")]
    pub client_secret: String,
    #[serde(default, alias = "Token")]
    pub token: String,
    #[serde(default = "unix_epoch", alias = "ExpireTime")]
    pub expire_time: DateTime<Utc>,
    /// Override for the Web API host, e.g. a local stub
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    /// Override for the accounts token endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            token: String::new(),
            expire_time: unix_epoch(),
            api_base_url: None,
            token_url: None,
        }
    }
}

impl Config {
    /// Load config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| MatcherError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| MatcherError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config, writing a blank template first if the file is missing.
    ///
    /// A missing file or one without client credentials is an error either
    /// way: the operator has to fill in `clientId` and `clientSecret`.
    pub fn load_or_create_template(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!("No config file at {}, writing a template", path.display());
            Config::default().save(path)?;
            return Err(MatcherError::MissingConfig(format!(
                "couldn't read config file, please edit {} and run again",
                path.display()
            )));
        }

        let config = Self::from_file(path)?;
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(MatcherError::MissingConfig(format!(
                "clientId and clientSecret must be set in {}",
                path.display()
            )));
        }
        Ok(config)
    }

    fn to_json(&self, path: &Path) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|source| MatcherError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the config as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json(path)?;

        if let Some(parent) = non_empty_parent(path) {
            std::fs::create_dir_all(parent).map_err(|source| MatcherError::Output {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, json).map_err(|source| MatcherError::Output {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Same as [`Config::save`], without blocking the runtime
    pub async fn persist(&self, path: &Path) -> Result<()> {
        let json = self.to_json(path)?;

        if let Some(parent) = non_empty_parent(path) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| MatcherError::Output {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(path, json)
            .await
            .map_err(|source| MatcherError::Output {
                path: path.to_path_buf(),
                source,
            })
    }

    /// The cached token as a credential (may be empty or expired)
    pub fn credential(&self) -> Credential {
        Credential {
            token: self.token.clone(),
            expires_at: self.expire_time,
        }
    }

    pub fn set_credential(&mut self, credential: &Credential) {
        self.token = credential.token.clone();
        self.expire_time = credential.expires_at;
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(SPOTIFY_API_BASE_URL)
    }

    pub fn token_url(&self) -> &str {
        self.token_url.as_deref().unwrap_or(SPOTIFY_TOKEN_URL)
    }

    /// Default location: `config.json` in the working directory
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }
}
