//! Core data model for liftlog.
//!
//! Everything hangs off one root: the exercise catalog, the history of
//! finished workouts, and the single in-progress workout.

mod body_part;
mod exercise;
mod workout;

use serde::{Deserialize, Serialize};

pub use body_part::BodyPart;
pub use exercise::{Exercise, ExerciseId, default_catalog};
pub use workout::{ExerciseLog, Set, SetField, Workout};

/// Name shown for an exercise id that no longer resolves in the catalog.
pub const UNKNOWN_EXERCISE: &str = "Unknown";

/// The whole persisted state graph.
///
/// `history` is most-recent-first and never mutated once a workout lands in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootState {
    pub exercises: Vec<Exercise>,

    pub history: Vec<Workout>,

    #[serde(default)]
    pub active_workout: Option<Workout>,
}

impl Default for RootState {
    /// The state of a first launch: the built-in catalog and nothing else.
    fn default() -> Self {
        Self {
            exercises: default_catalog(),
            history: Vec::new(),
            active_workout: None,
        }
    }
}

impl RootState {
    /// Looks up a catalog entry by id.
    pub fn exercise(&self, id: &ExerciseId) -> Option<&Exercise> {
        self.exercises.iter().find(|e| &e.id == id)
    }

    /// Resolves an exercise id to its display name.
    ///
    /// Dangling ids (the catalog entry was deleted) resolve to [`UNKNOWN_EXERCISE`].
    pub fn exercise_name(&self, id: &ExerciseId) -> &str {
        self.exercise(id).map_or(UNKNOWN_EXERCISE, |e| e.name.as_str())
    }
}
