//! Rule evaluation: partitions analyzed tracks into mood buckets.

use super::definition::MoodDefinition;
use crate::models::{AnalyzedTrack, AudioFeatures, Track};

/// What to do when a constrained dimension is absent (or non-numeric) in a feature vector.
///
/// `Satisfied` reproduces the legacy lenient behaviour and is the default;
/// `Rejected` excludes the track from that mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingDimension {
    #[default]
    Satisfied,
    Rejected,
}

/// Ordered tracks matching one mood
#[derive(Debug, Clone, PartialEq)]
pub struct MoodBucket {
    pub key: String,
    pub name: String,
    pub tracks: Vec<Track>,
}

/// Every mood of the table mapped to its (possibly empty) bucket, in table order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoodBuckets {
    buckets: Vec<MoodBucket>,
}

impl MoodBuckets {
    pub fn get(&self, key: &str) -> Option<&[Track]> {
        self.buckets
            .iter()
            .find(|b| b.key == key)
            .map(|b| b.tracks.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoodBucket> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// (key, display name, track count) per mood
    pub fn summary(&self) -> Vec<(&str, &str, usize)> {
        self.buckets
            .iter()
            .map(|b| (b.key.as_str(), b.name.as_str(), b.tracks.len()))
            .collect()
    }
}

/// True iff every predicate of `mood` holds for `features` (absent dimensions pass).
pub fn matches(features: &AudioFeatures, mood: &MoodDefinition) -> bool {
    matches_with(features, mood, MissingDimension::Satisfied)
}

pub fn matches_with(
    features: &AudioFeatures,
    mood: &MoodDefinition,
    policy: MissingDimension,
) -> bool {
    mood.characteristics()
        .iter()
        .all(|(dimension, predicate)| match features.dimension(*dimension) {
            Some(value) => predicate.holds(value),
            None => policy == MissingDimension::Satisfied,
        })
}

/// Classify with the default (lenient) missing-dimension policy.
pub fn classify(tracks: &[AnalyzedTrack], table: &[MoodDefinition]) -> MoodBuckets {
    classify_with(tracks, table, MissingDimension::Satisfied)
}

/// Partition tracks into mood buckets.
///
/// A track can land in zero, one or several buckets. Tracks without a feature
/// vector match nothing. Scan order is preserved within each bucket.
pub fn classify_with(
    tracks: &[AnalyzedTrack],
    table: &[MoodDefinition],
    policy: MissingDimension,
) -> MoodBuckets {
    let mut buckets: Vec<MoodBucket> = table
        .iter()
        .map(|mood| MoodBucket {
            key: mood.key().to_string(),
            name: mood.name().to_string(),
            tracks: Vec::new(),
        })
        .collect();

    let mut unanalyzed = 0usize;
    for analyzed in tracks {
        let Some(features) = &analyzed.features else {
            unanalyzed += 1;
            continue;
        };

        for (mood, bucket) in table.iter().zip(buckets.iter_mut()) {
            if matches_with(features, mood, policy) {
                bucket.tracks.push(analyzed.track.clone());
            }
        }
    }

    log::debug!(
        "[Classifier] Classified {} tracks into {} moods ({} without features)",
        tracks.len(),
        table.len(),
        unanalyzed
    );

    MoodBuckets { buckets }
}
