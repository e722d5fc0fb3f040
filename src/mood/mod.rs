//! Mood classification: a static rule table evaluated deterministically over audio features.

pub mod classifier;
pub mod definition;
pub mod table;

pub use classifier::{
    classify, classify_with, matches, matches_with, MissingDimension, MoodBucket, MoodBuckets,
};
pub use definition::{MoodDefinition, MoodDefinitionError, Predicate};
pub use table::{find_mood, mood_table, MOOD_TABLE};
