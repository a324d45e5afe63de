//! Active-workout operations: start, edit, finish, cancel.
//!
//! Only the active workout is reachable from here. History entries are never
//! handed out mutably, which is what keeps them frozen.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::model::{ExerciseId, ExerciseLog, SetField, Workout};
use crate::storage::KeyValueStore;

use super::{Ignored, Outcome, Result, StoreError, WorkoutStore};

impl<S: KeyValueStore> WorkoutStore<S> {
    /// Starts a new, empty active workout.
    ///
    /// An unfinished workout already in progress is discarded, not merged.
    /// The routine reference is accepted but has no effect yet.
    pub fn start_workout(&mut self, _routine: Option<&str>) -> Result<Outcome> {
        let workout = Workout::start(self.clock.now());
        info!(workout = %workout.id, "workout started");
        if let Some(previous) = self.state.active_workout.replace(workout) {
            warn!(
                discarded = %previous.id,
                logs = previous.exercises.len(),
                "unfinished workout replaced"
            );
        }
        self.commit(Outcome::Applied)
    }

    /// Discards the active workout without a trace.
    pub fn cancel_workout(&mut self) -> Result<Outcome> {
        let outcome = match self.state.active_workout.take() {
            Some(workout) => {
                info!(workout = %workout.id, "workout cancelled");
                Outcome::Applied
            }
            None => Outcome::Ignored(Ignored::NoActiveWorkout),
        };
        self.commit(outcome)
    }

    /// Stamps the active workout's end time and moves it to the front of history.
    pub fn finish_workout(&mut self) -> Result<Outcome> {
        let Some(mut workout) = self.state.active_workout.take() else {
            return self.commit(Outcome::Ignored(Ignored::NoActiveWorkout));
        };
        // A clock that stepped backwards must not produce a negative duration.
        workout.end_time = Some(self.clock.now().max(workout.start_time));
        info!(workout = %workout.id, logs = workout.exercises.len(), "workout finished");
        self.state.history.insert(0, workout);
        self.commit(Outcome::Applied)
    }

    /// Appends a log for `exercise_id` to the active workout, seeded with one zeroed set.
    ///
    /// The id is not checked against the catalog.
    pub fn add_exercise_to_workout(&mut self, exercise_id: &ExerciseId) -> Result<Outcome> {
        let Some(workout) = self.state.active_workout.as_mut() else {
            return self.commit(Outcome::Ignored(Ignored::NoActiveWorkout));
        };
        let log = ExerciseLog::new(exercise_id.clone());
        debug!(log = %log.id, exercise = %exercise_id, "exercise added to workout");
        workout.exercises.push(log);
        self.commit(Outcome::Applied)
    }

    /// Appends a set to a log, carrying over the last set's weight and reps.
    pub fn add_set(&mut self, log_id: Uuid) -> Result<Outcome> {
        let outcome = match self.state.active_workout.as_mut() {
            None => Outcome::Ignored(Ignored::NoActiveWorkout),
            Some(workout) => match workout.log_mut(log_id) {
                None => Outcome::Ignored(Ignored::LogNotFound),
                Some(log) => {
                    let set = log.next_set();
                    debug!(log = %log_id, set = %set.id, "set added");
                    log.sets.push(set);
                    Outcome::Applied
                }
            },
        };
        self.commit(outcome)
    }

    /// Replaces one field of one set. No other set is touched.
    ///
    /// A weight that is NaN or infinite cannot be stored and is rejected with
    /// [`StoreError::InvalidArgument`] before anything changes.
    pub fn update_set(&mut self, log_id: Uuid, set_id: Uuid, field: SetField) -> Result<Outcome> {
        if let SetField::Weight(weight) = field
            && !weight.is_finite()
        {
            return Err(StoreError::InvalidArgument(format!(
                "weight must be a finite number, got {weight}"
            )));
        }
        let outcome = match self.state.active_workout.as_mut() {
            None => Outcome::Ignored(Ignored::NoActiveWorkout),
            Some(workout) => match workout.log_mut(log_id) {
                None => Outcome::Ignored(Ignored::LogNotFound),
                Some(log) => match log.set_mut(set_id) {
                    None => Outcome::Ignored(Ignored::SetNotFound),
                    Some(set) => {
                        set.apply(field);
                        debug!(log = %log_id, set = %set_id, ?field, "set updated");
                        Outcome::Applied
                    }
                },
            },
        };
        self.commit(outcome)
    }

    /// Removes a set from a log. A log left with no sets stays in the workout.
    pub fn remove_set(&mut self, log_id: Uuid, set_id: Uuid) -> Result<Outcome> {
        let outcome = match self.state.active_workout.as_mut() {
            None => Outcome::Ignored(Ignored::NoActiveWorkout),
            Some(workout) => match workout.log_mut(log_id) {
                None => Outcome::Ignored(Ignored::LogNotFound),
                Some(log) => match log.sets.iter().position(|s| s.id == set_id) {
                    None => Outcome::Ignored(Ignored::SetNotFound),
                    Some(index) => {
                        log.sets.remove(index);
                        debug!(log = %log_id, set = %set_id, "set removed");
                        Outcome::Applied
                    }
                },
            },
        };
        self.commit(outcome)
    }
}
