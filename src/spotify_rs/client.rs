use std::time::Duration;

use reqwest::StatusCode;

use crate::error::{MatcherError, Result};
use crate::spotify_rs::types::{SpotifySearchResponse, SpotifyTrack};

pub const SPOTIFY_API_BASE_URL: &str = "https://api.spotify.com";

/// Market the search results are restricted to
pub const SEARCH_MARKET: &str = "US";

/// Number of results requested per search
pub const SEARCH_LIMIT: u32 = 5;

/// Spotify API client
pub struct SpotifyClient {
    base_url: String,
    client: reqwest::Client,
}

impl SpotifyClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/v1/search?q={}&type=track&market={}&limit={}",
            self.base_url,
            urlencoding::encode(query),
            SEARCH_MARKET,
            SEARCH_LIMIT
        )
    }

    /// Search the catalog for tracks matching `query`, in Spotify's rank order
    pub async fn search_tracks(&self, access_token: &str, query: &str) -> Result<Vec<SpotifyTrack>> {
        let url = self.search_url(query);
        log::debug!("Searching Spotify: {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(MatcherError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(MatcherError::Transport)?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(MatcherError::Auth {
                reason: format!("search rejected the access token: {}", body),
            });
        }
        if !status.is_success() {
            return Err(MatcherError::Service { status, body });
        }

        let page: SpotifySearchResponse =
            serde_json::from_str(&body).map_err(MatcherError::Decode)?;
        Ok(page.tracks.items)
    }
}
