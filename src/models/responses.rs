use super::{AudioFeatures, Track};
use serde::Deserialize;

/// One page of `GET /me/tracks`
#[derive(Debug, Deserialize, Clone)]
pub struct SavedTracksPage {
    #[serde(default)]
    pub items: Vec<SavedTrackItem>,
    pub total: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SavedTrackItem {
    #[serde(default)]
    pub added_at: Option<String>,
    #[serde(default)]
    pub track: Option<Track>, // null for tracks removed from the catalog
}

/// `GET /audio-features?ids=...` returns one entry per requested id, null when unknown
#[derive(Debug, Deserialize, Clone)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotResponse {
    #[serde(default)]
    pub snapshot_id: Option<String>,
}
