use chrono::{Duration, Utc};

use crate::error::{MatcherError, Result};
use crate::ports::catalog::{Candidate, CatalogSearch, Credential, TokenIssuer};
use crate::spotify_rs::types::SpotifyTrack;
use crate::spotify_rs::{SpotifyClient, request_client_credentials_token};

/// Production adapter from the Spotify search endpoint to the [`CatalogSearch`] port.
pub struct SpotifyCatalog {
    client: SpotifyClient,
}

impl SpotifyCatalog {
    pub fn new(client: SpotifyClient) -> Self {
        Self { client }
    }
}

fn to_candidate(track: SpotifyTrack) -> Candidate {
    Candidate {
        primary_artist: track
            .artists
            .into_iter()
            .next()
            .map(|artist| artist.name)
            .unwrap_or_default(),
        title: track.name,
        uri: track.uri,
    }
}

#[async_trait::async_trait]
impl CatalogSearch for SpotifyCatalog {
    #[tracing::instrument(skip(self, credential))]
    async fn search(&self, query: &str, credential: &Credential) -> Result<Vec<Candidate>> {
        let tracks = self.client.search_tracks(&credential.token, query).await?;
        log::debug!("Spotify returned {} candidates", tracks.len());
        Ok(tracks.into_iter().map(to_candidate).collect())
    }
}

/// Issues app-only tokens from the Spotify accounts service.
pub struct SpotifyTokenIssuer {
    client: reqwest::Client,
    token_url: String,
}

impl SpotifyTokenIssuer {
    pub fn new(client: reqwest::Client, token_url: impl Into<String>) -> Self {
        Self {
            client,
            token_url: token_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl TokenIssuer for SpotifyTokenIssuer {
    async fn issue(&self, client_id: &str, client_secret: &str) -> Result<Credential> {
        let requested_at = Utc::now();
        let response =
            request_client_credentials_token(&self.client, &self.token_url, client_id, client_secret)
                .await?;

        let expires_at = Duration::try_seconds(response.expires_in)
            .and_then(|lifetime| requested_at.checked_add_signed(lifetime))
            .ok_or_else(|| MatcherError::Auth {
                reason: format!(
                    "token endpoint returned an out of range expires_in ({})",
                    response.expires_in
                ),
            })?;

        Ok(Credential {
            token: response.access_token,
            expires_at,
        })
    }
}
