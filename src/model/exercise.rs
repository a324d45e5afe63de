//! Catalog entries: the exercises a workout can log.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BodyPart;

/// Opaque, stable identifier of a catalog exercise.
///
/// Held by exercise logs as a weak reference: it may outlive the catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(String);

impl ExerciseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh, never-reused id for a new catalog entry.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: ExerciseId,

    pub name: String,

    /// Non-empty for entries added through the catalog; entries migrated
    /// from the single-tag schema may carry none.
    pub body_parts: BTreeSet<BodyPart>,
}

/// The catalog a first launch starts with.
pub fn default_catalog() -> Vec<Exercise> {
    [
        ("1", "Bench Press", BodyPart::Chest),
        ("2", "Squat", BodyPart::Legs),
        ("3", "Deadlift", BodyPart::Back),
        ("4", "Overhead Press", BodyPart::Shoulders),
        ("5", "Pull Up", BodyPart::Back),
        ("6", "Dumbbell Curl", BodyPart::Arms),
        ("7", "Tricep Extension", BodyPart::Arms),
        ("8", "Leg Press", BodyPart::Legs),
    ]
    .into_iter()
    .map(|(id, name, part)| Exercise {
        id: ExerciseId::new(id),
        name: name.to_string(),
        body_parts: BTreeSet::from([part]),
    })
    .collect()
}
