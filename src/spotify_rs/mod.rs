//! Thin HTTP layer over the two Spotify endpoints the matcher needs.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{SPOTIFY_TOKEN_URL, request_client_credentials_token};
pub use client::{SPOTIFY_API_BASE_URL, SpotifyClient};
