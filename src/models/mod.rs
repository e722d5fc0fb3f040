// Data models for Spotify Web API entities

pub mod audio_features;
pub mod credential;
pub mod playlist;
pub mod responses;
pub mod track;
pub mod user;

// Re-export commonly used types
pub use audio_features::{AudioFeatures, FeatureDimension};
pub use credential::Credential;
pub use playlist::{NewPlaylist, Playlist, PublishedPlaylist};
pub use responses::{AudioFeaturesResponse, SavedTrackItem, SavedTracksPage, SnapshotResponse};
pub use track::{AnalyzedTrack, Artist, Track};
pub use user::User;
