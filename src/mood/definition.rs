use crate::models::FeatureDimension;
use thiserror::Error;

/// Constraint on a single feature dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Predicate {
    /// Value must equal the constant (discrete dimensions such as `mode`)
    Exact(f64),
    /// Inclusive bounds; a missing bound leaves that side unconstrained
    Range { min: Option<f64>, max: Option<f64> },
}

impl Predicate {
    pub fn exact(value: f64) -> Self {
        Predicate::Exact(value)
    }

    pub fn at_least(min: f64) -> Self {
        Predicate::Range {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f64) -> Self {
        Predicate::Range {
            min: None,
            max: Some(max),
        }
    }

    pub fn between(min: f64, max: f64) -> Self {
        Predicate::Range {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn holds(&self, value: f64) -> bool {
        match *self {
            Predicate::Exact(expected) => value == expected,
            Predicate::Range { min, max } => {
                min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
            }
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum MoodDefinitionError {
    #[error("mood '{0}' has no characteristics")]
    EmptyCharacteristics(String),

    #[error("mood '{mood}': {dimension} range has min greater than max")]
    InvertedRange {
        mood: String,
        dimension: FeatureDimension,
    },
}

/// A named mood and the feature predicates a track must satisfy to belong to it
#[derive(Debug, Clone, PartialEq)]
pub struct MoodDefinition {
    key: String,
    name: String,
    accent: String,
    characteristics: Vec<(FeatureDimension, Predicate)>,
}

impl MoodDefinition {
    /// Build a definition, rejecting empty characteristic sets and inverted ranges.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        accent: impl Into<String>,
        characteristics: Vec<(FeatureDimension, Predicate)>,
    ) -> Result<Self, MoodDefinitionError> {
        let key = key.into();
        if characteristics.is_empty() {
            return Err(MoodDefinitionError::EmptyCharacteristics(key));
        }
        for (dimension, predicate) in &characteristics {
            if let Predicate::Range {
                min: Some(min),
                max: Some(max),
            } = predicate
            {
                if min > max {
                    return Err(MoodDefinitionError::InvertedRange {
                        mood: key,
                        dimension: *dimension,
                    });
                }
            }
        }

        Ok(Self {
            key,
            name: name.into(),
            accent: accent.into(),
            characteristics,
        })
    }

    /// Stable lookup key, e.g. `happy`
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display name, e.g. `Happy`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accent colour as `#rrggbb`; presentation only
    pub fn accent(&self) -> &str {
        &self.accent
    }

    pub fn characteristics(&self) -> &[(FeatureDimension, Predicate)] {
        &self.characteristics
    }

    /// Human-readable summary such as `energy >= 0.6, mode = 1`
    pub fn describe(&self) -> String {
        self.characteristics
            .iter()
            .map(|(dimension, predicate)| match predicate {
                Predicate::Exact(v) => format!("{} = {}", dimension, v),
                Predicate::Range {
                    min: Some(min),
                    max: Some(max),
                } => format!("{} in {}..={}", dimension, min, max),
                Predicate::Range {
                    min: Some(min),
                    max: None,
                } => format!("{} >= {}", dimension, min),
                Predicate::Range {
                    min: None,
                    max: Some(max),
                } => format!("{} <= {}", dimension, max),
                Predicate::Range {
                    min: None,
                    max: None,
                } => format!("{} any", dimension),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
