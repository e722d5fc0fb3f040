//! Publisher service: turns a mood bucket into a playlist on the user's account.
use crate::api::MusicApi;
use crate::constants::{APP_NAME, PLAYLIST_PUBLIC_DEFAULT, PLAYLIST_TRACK_CAP};
use crate::models::{Credential, NewPlaylist, PublishedPlaylist, Track};
use crate::mood::MoodDefinition;
use crate::utils::errors::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct PublishOptions {
    pub public: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            public: PLAYLIST_PUBLIC_DEFAULT,
        }
    }
}

pub fn playlist_name(mood: &MoodDefinition) -> String {
    format!("{} Playlist by {}", mood.name(), APP_NAME)
}

pub fn playlist_description(mood: &MoodDefinition) -> String {
    format!(
        "Auto-generated {} playlist from your liked songs",
        mood.name().to_lowercase()
    )
}

/// Up to `cap` playable URIs, in bucket order
pub fn select_track_uris(tracks: &[Track], cap: usize) -> Vec<String> {
    tracks
        .iter()
        .filter_map(|t| t.playable_uri())
        .take(cap)
        .map(str::to_string)
        .collect()
}

/// Create a playlist for `mood` holding the first 100 playable tracks of its bucket.
///
/// Tracks are selected before anything is sent: with no playable track the call
/// fails without creating a playlist. A failure after creation leaves the
/// (empty) playlist in place.
pub async fn publish(
    api: &dyn MusicApi,
    credential: &Credential,
    mood: &MoodDefinition,
    tracks: &[Track],
    options: &PublishOptions,
) -> Result<PublishedPlaylist, AppError> {
    let uris = select_track_uris(tracks, PLAYLIST_TRACK_CAP);
    if uris.is_empty() {
        return Err(AppError::Publish(format!(
            "no playable tracks in the {} bucket",
            mood.name()
        )));
    }

    let user = api
        .current_user(credential)
        .await
        .map_err(|e| AppError::from_api(e, AppError::Publish))?;

    let request = NewPlaylist {
        name: playlist_name(mood),
        description: playlist_description(mood),
        public: options.public,
    };
    let playlist = api
        .create_playlist(credential, &user.id, &request)
        .await
        .map_err(|e| AppError::from_api(e, AppError::Publish))?;

    api.add_tracks_to_playlist(credential, &playlist.id, &uris)
        .await
        .map_err(|e| {
            log::warn!(
                "[Publisher] Playlist {} created but adding tracks failed: {}",
                playlist.id,
                e
            );
            AppError::from_api(e, AppError::Publish)
        })?;

    log::info!(
        "[Publisher] Published '{}' ({}) with {} tracks",
        request.name,
        playlist.id,
        uris.len()
    );

    Ok(PublishedPlaylist {
        id: playlist.id,
        name: request.name,
        tracks_added: uris.len(),
    })
}
