// Spotify Web API client modules

pub mod client;
pub mod playlists;
pub mod tracks;
pub mod users;

pub use client::SpotifyClient;

use crate::models::{AudioFeatures, Credential, NewPlaylist, Playlist, SavedTracksPage, User};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors at the HTTP seam, before they are mapped to an operation-level error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not authorized (status {status}), please log in again")]
    Unauthorized { status: u16 },

    #[error("Rate limited by the API")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Connection error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::RateLimited { .. } | ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            ApiError::Unauthorized { .. } | ApiError::InvalidResponse(_) => false,
        }
    }
}

/// The slice of the music service the app consumes.
///
/// Every call takes the credential explicitly; implementations hold no session state.
#[async_trait]
pub trait MusicApi: Send + Sync {
    /// One page of the user's saved tracks (`limit` items starting at `offset`)
    async fn saved_tracks_page(
        &self,
        credential: &Credential,
        limit: u32,
        offset: u32,
    ) -> Result<SavedTracksPage, ApiError>;

    /// Audio features for a batch of track ids, one entry per id in request order
    async fn audio_features(
        &self,
        credential: &Credential,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, ApiError>;

    /// The user the credential belongs to
    async fn current_user(&self, credential: &Credential) -> Result<User, ApiError>;

    async fn create_playlist(
        &self,
        credential: &Credential,
        user_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<Playlist, ApiError>;

    async fn add_tracks_to_playlist(
        &self,
        credential: &Credential,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError>;
}
