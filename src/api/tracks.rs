// Saved tracks and audio features endpoints
use super::{ApiError, SpotifyClient};
use crate::models::{AudioFeatures, AudioFeaturesResponse, Credential, SavedTracksPage};

impl SpotifyClient {
    /// `GET /me/tracks?limit=..&offset=..`
    pub async fn fetch_saved_tracks_page(
        &self,
        credential: &Credential,
        limit: u32,
        offset: u32,
    ) -> Result<SavedTracksPage, ApiError> {
        let url = self.url(&format!("/me/tracks?limit={}&offset={}", limit, offset));
        self.get_json(&url, credential).await
    }

    /// `GET /audio-features?ids=a,b,c`
    ///
    /// The response must carry exactly one entry (possibly null) per requested id.
    pub async fn fetch_audio_features(
        &self,
        credential: &Credential,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.url(&format!(
            "/audio-features?ids={}",
            urlencoding::encode(&ids.join(","))
        ));
        let response: AudioFeaturesResponse = self.get_json(&url, credential).await?;

        if response.audio_features.len() != ids.len() {
            return Err(ApiError::InvalidResponse(format!(
                "expected {} audio feature entries, got {}",
                ids.len(),
                response.audio_features.len()
            )));
        }

        Ok(response.audio_features)
    }
}
