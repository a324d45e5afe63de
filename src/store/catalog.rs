//! Catalog operations: adding, deleting, and naming exercises.

use std::collections::BTreeSet;

use tracing::info;

use crate::model::{BodyPart, Exercise, ExerciseId};
use crate::storage::KeyValueStore;

use super::{Ignored, Outcome, Result, StoreError, WorkoutStore};

impl<S: KeyValueStore> WorkoutStore<S> {
    /// Adds a catalog entry and returns its new id.
    ///
    /// The name is trimmed. An empty name or an empty set of body parts is
    /// rejected with [`StoreError::InvalidArgument`] before anything changes.
    ///
    /// On [`StoreError::PersistenceFailed`] the entry is still in the catalog:
    /// new entries are always appended, so it is the last item of
    /// [`exercises`](Self::exercises).
    pub fn add_exercise(
        &mut self,
        name: &str,
        body_parts: impl IntoIterator<Item = BodyPart>,
    ) -> Result<ExerciseId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidArgument(
                "exercise name must not be empty".into(),
            ));
        }
        let body_parts: BTreeSet<BodyPart> = body_parts.into_iter().collect();
        if body_parts.is_empty() {
            return Err(StoreError::InvalidArgument(
                "exercise needs at least one body part".into(),
            ));
        }

        let exercise = Exercise {
            id: ExerciseId::generate(),
            name: name.to_string(),
            body_parts,
        };
        let id = exercise.id.clone();
        info!(exercise = %id, name, "exercise added to catalog");
        self.state.exercises.push(exercise);
        let _ = self.commit(Outcome::Applied)?;
        Ok(id)
    }

    /// Removes a catalog entry.
    ///
    /// Workouts that logged it keep the id; it then resolves to
    /// [`UNKNOWN_EXERCISE`](crate::model::UNKNOWN_EXERCISE).
    pub fn delete_exercise(&mut self, id: &ExerciseId) -> Result<Outcome> {
        let before = self.state.exercises.len();
        self.state.exercises.retain(|e| &e.id != id);
        let outcome = if self.state.exercises.len() < before {
            info!(exercise = %id, "exercise deleted from catalog");
            Outcome::Applied
        } else {
            Outcome::Ignored(Ignored::ExerciseNotFound)
        };
        self.commit(outcome)
    }

    /// The display name of an exercise, or the fallback for a dangling id.
    pub fn exercise_name(&self, id: &ExerciseId) -> &str {
        self.state.exercise_name(id)
    }
}
