// Playlist API endpoints
use super::{ApiError, SpotifyClient};
use crate::models::{Credential, NewPlaylist, Playlist, SnapshotResponse};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct AddTracksBody<'a> {
    uris: &'a [String],
}

impl SpotifyClient {
    /// `POST /users/{user_id}/playlists`
    pub async fn create_user_playlist(
        &self,
        credential: &Credential,
        user_id: &str,
        playlist: &NewPlaylist,
    ) -> Result<Playlist, ApiError> {
        let url = self.url(&format!("/users/{}/playlists", urlencoding::encode(user_id)));
        let created: Playlist = self.post_json(&url, credential, playlist).await?;

        log::info!("[Playlists] Created playlist '{}' ({})", created.name, created.id);
        Ok(created)
    }

    /// `POST /playlists/{playlist_id}/tracks` (at most 100 URIs per call)
    pub async fn add_playlist_tracks(
        &self,
        credential: &Credential,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<(), ApiError> {
        let url = self.url(&format!(
            "/playlists/{}/tracks",
            urlencoding::encode(playlist_id)
        ));
        let snapshot: SnapshotResponse = self
            .post_json(&url, credential, &AddTracksBody { uris })
            .await?;

        log::debug!(
            "[Playlists] Added {} tracks to {} (snapshot {:?})",
            uris.len(),
            playlist_id,
            snapshot.snapshot_id
        );
        Ok(())
    }
}
