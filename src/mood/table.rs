//! The fixed mood table. Hand-authored; not editable at runtime.

use super::definition::{MoodDefinition, Predicate};
use crate::models::FeatureDimension::*;
use once_cell::sync::Lazy;

pub static MOOD_TABLE: Lazy<Vec<MoodDefinition>> = Lazy::new(|| {
    let moods = vec![
        MoodDefinition::new(
            "happy",
            "Happy",
            "#ffd54f",
            vec![
                (Energy, Predicate::at_least(0.6)),
                (Valence, Predicate::at_least(0.7)),
            ],
        ),
        MoodDefinition::new(
            "chill",
            "Chill",
            "#80cbc4",
            vec![
                (Energy, Predicate::at_most(0.5)),
                (Valence, Predicate::between(0.3, 0.7)),
                (Acousticness, Predicate::at_least(0.3)),
            ],
        ),
        MoodDefinition::new(
            "energetic",
            "Energetic",
            "#ff7043",
            vec![
                (Energy, Predicate::at_least(0.8)),
                (Tempo, Predicate::at_least(120.0)),
            ],
        ),
        MoodDefinition::new(
            "melancholic",
            "Melancholic",
            "#7986cb",
            vec![
                (Energy, Predicate::at_most(0.5)),
                (Valence, Predicate::at_most(0.35)),
                (Mode, Predicate::exact(0.0)),
            ],
        ),
        MoodDefinition::new(
            "focused",
            "Focused",
            "#4fc3f7",
            vec![
                (Energy, Predicate::between(0.3, 0.7)),
                (Instrumentalness, Predicate::at_least(0.5)),
                (Speechiness, Predicate::at_most(0.1)),
            ],
        ),
        MoodDefinition::new(
            "party",
            "Party",
            "#e040fb",
            vec![
                (Danceability, Predicate::at_least(0.7)),
                (Energy, Predicate::at_least(0.7)),
                (Valence, Predicate::at_least(0.5)),
            ],
        ),
    ];

    moods
        .into_iter()
        .filter_map(|mood| match mood {
            Ok(mood) => Some(mood),
            Err(e) => {
                log::error!("[Moods] Skipping invalid built-in mood: {}", e);
                None
            }
        })
        .collect()
});

pub fn mood_table() -> &'static [MoodDefinition] {
    &MOOD_TABLE
}

/// Look a mood up by key (case-insensitive) or display name
pub fn find_mood(name: &str) -> Option<&'static MoodDefinition> {
    let wanted = name.trim();
    mood_table()
        .iter()
        .find(|m| m.key().eq_ignore_ascii_case(wanted) || m.name().eq_ignore_ascii_case(wanted))
}
