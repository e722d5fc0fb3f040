//! reqwest-backed implementation of [`MusicApi`] against the Spotify Web API.

use super::{ApiError, MusicApi};
use crate::models::{AudioFeatures, Credential, NewPlaylist, Playlist, SavedTracksPage, User};
use crate::utils::http::{read_json, send_with_retry, RetryPolicy};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// HTTP client for the Spotify Web API.
///
/// Holds connection settings only; the credential is passed with every call.
#[derive(Clone)]
pub struct SpotifyClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl SpotifyClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. "https://api.spotify.com/v1"
    /// * `timeout_secs` - Per-request timeout in seconds
    /// * `retry` - Retry policy for 429 / 5xx responses
    pub fn new(base_url: &str, timeout_secs: u64, retry: RetryPolicy) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, url: &str, credential: &Credential) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", credential.bearer_header())
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        credential: &Credential,
    ) -> Result<T, ApiError> {
        log::debug!("[Api] GET {}", url);
        let response =
            send_with_retry(|| self.request(Method::GET, url, credential), &self.retry, true, url)
                .await?;
        read_json(response).await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        credential: &Credential,
        body: &B,
    ) -> Result<T, ApiError> {
        log::debug!("[Api] POST {}", url);
        let response = send_with_retry(
            || self.request(Method::POST, url, credential).json(body),
            &self.retry,
            false,
            url,
        )
        .await?;
        read_json(response).await
    }
}

#[async_trait]
impl MusicApi for SpotifyClient {
    async fn saved_tracks_page(
        &self,
        credential: &Credential,
        limit: u32,
        offset: u32,
    ) -> Result<SavedTracksPage, ApiError> {
        self.fetch_saved_tracks_page(credential, limit, offset).await
    }

    async fn audio_features(
        &self,
        credential: &Credential,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, ApiError> {
        self.fetch_audio_features(credential, ids).await
    }

    async fn current_user(&self, credential: &Credential) -> Result<User, ApiError> {
        self.fetch_current_user(credential).await
    }

    async fn create_playlist(
        &self,
        credential: &Credential,
        user_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<Playlist, ApiError> {
        self.create_user_playlist(credential, user_id, playlist).await
    }

    async fn add_tracks_to_playlist(
        &self,
        credential: &Credential,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError> {
        self.add_playlist_tracks(credential, playlist_id, uris).await
    }
}
