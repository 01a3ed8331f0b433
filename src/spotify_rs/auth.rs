use std::collections::HashMap;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{MatcherError, Result};
use crate::spotify_rs::types::SpotifyTokenResponse;

pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Value of the `Authorization` header for the token endpoint
fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", client_id, client_secret))
    )
}

/// Request an app-only access token with the client credentials grant
/// https://developer.spotify.com/documentation/web-api/tutorials/client-credentials-flow
pub async fn request_client_credentials_token(
    client: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<SpotifyTokenResponse> {
    let mut params = HashMap::new();
    params.insert("grant_type", "client_credentials");

    let response = client
        .post(token_url)
        // Serializes to x-www-form-urlencoded and sets the content type
        .form(&params)
        .header("Authorization", basic_auth_header(client_id, client_secret))
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .map_err(MatcherError::Transport)?;

    let status = response.status();
    let body = response.text().await.map_err(MatcherError::Transport)?;

    if !status.is_success() {
        return Err(MatcherError::Auth {
            reason: format!("token endpoint returned {}: {}", status, body),
        });
    }

    serde_json::from_str(&body).map_err(MatcherError::Decode)
}
