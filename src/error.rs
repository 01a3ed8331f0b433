use std::path::PathBuf;

/// Everything that can go wrong while matching a playlist.
///
/// Each variant maps to one failure category an operator cares about:
/// local files, authentication, the network, the remote service, or
/// the shape of a response.
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Failed to read {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    MissingConfig(String),
    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Authentication failed: {reason}")]
    Auth { reason: String },
    #[error("Failed to send http request: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Non-success status {status} from catalog search: {body}")]
    Service {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Failed to parse response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl MatcherError {
    /// Whether the failure means the bearer credential was rejected and a
    /// refresh might fix it.
    pub fn is_auth(&self) -> bool {
        matches!(self, MatcherError::Auth { .. })
    }
}

pub type Result<T, E = MatcherError> = std::result::Result<T, E>;
