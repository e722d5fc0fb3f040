use super::AudioFeatures;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>, // Local files carry no catalog id
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub duration_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Artist {
    pub name: String,
}

impl Track {
    /// URI that can be submitted to the add-tracks endpoint, if any
    pub fn playable_uri(&self) -> Option<&str> {
        self.uri
            .as_deref()
            .map(str::trim)
            .filter(|uri| !uri.is_empty())
    }

    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A saved track paired with its audio features (absent when the service has none)
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedTrack {
    pub track: Track,
    pub features: Option<AudioFeatures>,
}

impl AnalyzedTrack {
    pub fn new(track: Track, features: Option<AudioFeatures>) -> Self {
        Self { track, features }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_spotify_track() {
        let json = r#"{
            "id": "4uLU6hMCjMI75M1A2tKUQC",
            "uri": "spotify:track:4uLU6hMCjMI75M1A2tKUQC",
            "name": "Never Gonna Give You Up",
            "artists": [{"name": "Rick Astley", "id": "0gxyHStUsqpMadRV0Di1Qt"}],
            "duration_ms": 213573,
            "popularity": 80
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.id.as_deref(), Some("4uLU6hMCjMI75M1A2tKUQC"));
        assert_eq!(track.artist_names(), "Rick Astley");
        assert_eq!(track.duration_ms, 213573);
    }

    #[test]
    fn test_local_track_has_no_id() {
        let json = r#"{"id": null, "uri": "spotify:local:::demo:180", "name": "demo"}"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert!(track.id.is_none());
        assert_eq!(track.playable_uri(), Some("spotify:local:::demo:180"));
    }

    #[test]
    fn test_blank_uri_is_not_playable() {
        let mut track: Track = serde_json::from_str(r#"{"id": "a", "uri": "   "}"#).unwrap();
        assert_eq!(track.playable_uri(), None);
        track.uri = None;
        assert_eq!(track.playable_uri(), None);
    }
}
