use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Precomputed audio descriptors for one track.
///
/// Every dimension is optional: the service occasionally returns nulls for
/// individual fields, and classification treats a missing value separately
/// from a present one.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AudioFeatures {
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub energy: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub valence: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub danceability: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub tempo: Option<f64>, // BPM
    #[serde(deserialize_with = "lenient_number")]
    pub acousticness: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub speechiness: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub instrumentalness: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub liveness: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub loudness: Option<f64>, // dB, typically -60..0
    #[serde(deserialize_with = "lenient_number")]
    pub mode: Option<f64>,     // 1 = major, 0 = minor
    #[serde(deserialize_with = "lenient_number")]
    pub key: Option<f64>,      // pitch class 0..11, -1 when undetected
}

// Non-numeric values (strings, booleans) become absent instead of failing the whole batch
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

/// Named dimension of an [`AudioFeatures`] vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureDimension {
    Energy,
    Valence,
    Danceability,
    Tempo,
    Acousticness,
    Speechiness,
    Instrumentalness,
    Liveness,
    Loudness,
    Mode,
    Key,
}

impl FeatureDimension {
    pub fn name(&self) -> &'static str {
        match self {
            FeatureDimension::Energy => "energy",
            FeatureDimension::Valence => "valence",
            FeatureDimension::Danceability => "danceability",
            FeatureDimension::Tempo => "tempo",
            FeatureDimension::Acousticness => "acousticness",
            FeatureDimension::Speechiness => "speechiness",
            FeatureDimension::Instrumentalness => "instrumentalness",
            FeatureDimension::Liveness => "liveness",
            FeatureDimension::Loudness => "loudness",
            FeatureDimension::Mode => "mode",
            FeatureDimension::Key => "key",
        }
    }
}

impl fmt::Display for FeatureDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl AudioFeatures {
    /// Value of a dimension, `None` when absent or not a finite number
    pub fn dimension(&self, dimension: FeatureDimension) -> Option<f64> {
        let value = match dimension {
            FeatureDimension::Energy => self.energy,
            FeatureDimension::Valence => self.valence,
            FeatureDimension::Danceability => self.danceability,
            FeatureDimension::Tempo => self.tempo,
            FeatureDimension::Acousticness => self.acousticness,
            FeatureDimension::Speechiness => self.speechiness,
            FeatureDimension::Instrumentalness => self.instrumentalness,
            FeatureDimension::Liveness => self.liveness,
            FeatureDimension::Loudness => self.loudness,
            FeatureDimension::Mode => self.mode,
            FeatureDimension::Key => self.key,
        };
        value.filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_feature_object() {
        let json = r#"{
            "danceability": 0.735, "energy": 0.578, "key": 5, "loudness": -11.84,
            "mode": 0, "speechiness": 0.0461, "acousticness": 0.514,
            "instrumentalness": 0.0902, "liveness": 0.159, "valence": 0.636,
            "tempo": 98.002, "type": "audio_features", "id": "06AKEBrKUckW0KREUWRnvT",
            "uri": "spotify:track:06AKEBrKUckW0KREUWRnvT", "duration_ms": 255349,
            "time_signature": 4
        }"#;

        let features: AudioFeatures = serde_json::from_str(json).unwrap();
        assert_eq!(features.id.as_deref(), Some("06AKEBrKUckW0KREUWRnvT"));
        assert_eq!(features.dimension(FeatureDimension::Mode), Some(0.0));
        assert_eq!(features.dimension(FeatureDimension::Key), Some(5.0));
        assert_eq!(features.dimension(FeatureDimension::Tempo), Some(98.002));
    }

    #[test]
    fn test_null_dimension_is_absent() {
        let features: AudioFeatures =
            serde_json::from_str(r#"{"id": "x", "energy": 0.7, "valence": null}"#).unwrap();
        assert_eq!(features.dimension(FeatureDimension::Energy), Some(0.7));
        assert_eq!(features.dimension(FeatureDimension::Valence), None);
        assert_eq!(features.dimension(FeatureDimension::Tempo), None);
    }

    #[test]
    fn test_non_numeric_dimension_is_absent() {
        let features: AudioFeatures =
            serde_json::from_str(r#"{"id": "x", "energy": "loud", "valence": 0.4}"#).unwrap();
        assert_eq!(features.dimension(FeatureDimension::Energy), None);
        assert_eq!(features.dimension(FeatureDimension::Valence), Some(0.4));
    }

    #[test]
    fn test_nan_is_treated_as_absent() {
        let features = AudioFeatures {
            energy: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(features.dimension(FeatureDimension::Energy), None);
    }

    #[test]
    fn test_display_uses_api_field_name() {
        assert_eq!(FeatureDimension::Instrumentalness.to_string(), "instrumentalness");
        assert_eq!(FeatureDimension::Mode.to_string(), "mode");
    }
}
