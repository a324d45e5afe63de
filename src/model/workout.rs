//! Workout types: sessions, the exercises logged in them, and their sets.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ExerciseId;

/// One performed set. Weight is unit-less.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Set {
    pub id: Uuid,

    #[serde(default)]
    pub weight: f64,

    #[serde(default)]
    pub reps: u32,

    /// Only completed sets count toward analytics and summaries.
    #[serde(default)]
    pub completed: bool,
}

impl Set {
    /// A fresh, not-yet-completed set.
    pub fn new(weight: f64, reps: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            weight,
            reps,
            completed: false,
        }
    }

    /// Replaces one field.
    pub fn apply(&mut self, field: SetField) {
        match field {
            SetField::Weight(weight) => self.weight = weight,
            SetField::Reps(reps) => self.reps = reps,
            SetField::Completed(completed) => self.completed = completed,
        }
    }
}

/// A single editable field of a [`Set`] together with its new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetField {
    Weight(f64),
    Reps(u32),
    Completed(bool),
}

/// One exercise's entry within a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub id: Uuid,

    /// May dangle once the catalog entry is deleted.
    pub exercise_id: ExerciseId,

    /// Insertion order is set order.
    pub sets: Vec<Set>,
}

impl ExerciseLog {
    /// A new log seeded with one zeroed set.
    pub fn new(exercise_id: ExerciseId) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise_id,
            sets: vec![Set::new(0.0, 0)],
        }
    }

    /// The set that would be appended next: weight and reps carried over
    /// from the last set, or zero when the log is empty.
    pub fn next_set(&self) -> Set {
        match self.sets.last() {
            Some(last) => Set::new(last.weight, last.reps),
            None => Set::new(0.0, 0),
        }
    }

    pub fn set_mut(&mut self, id: Uuid) -> Option<&mut Set> {
        self.sets.iter_mut().find(|s| s.id == id)
    }

    pub fn completed_sets(&self) -> impl Iterator<Item = &Set> {
        self.sets.iter().filter(|s| s.completed)
    }
}

/// A training session.
///
/// Active while `end_time` is `None`; once finished it is stamped and frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: Uuid,

    pub start_time: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Timestamp>,

    /// Insertion order is display order.
    pub exercises: Vec<ExerciseLog>,
}

impl Workout {
    /// An empty workout starting at `at`.
    pub fn start(at: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time: at,
            end_time: None,
            exercises: Vec::new(),
        }
    }

    pub fn log(&self, id: Uuid) -> Option<&ExerciseLog> {
        self.exercises.iter().find(|l| l.id == id)
    }

    pub fn log_mut(&mut self, id: Uuid) -> Option<&mut ExerciseLog> {
        self.exercises.iter_mut().find(|l| l.id == id)
    }

    /// The first log of the given catalog exercise, if any.
    pub fn log_for(&self, exercise_id: &ExerciseId) -> Option<&ExerciseLog> {
        self.exercises.iter().find(|l| &l.exercise_id == exercise_id)
    }

    /// Time since the start, clamped at zero.
    pub fn elapsed(&self, now: Timestamp) -> SignedDuration {
        let elapsed = now.duration_since(self.start_time);
        if elapsed.is_negative() {
            SignedDuration::ZERO
        } else {
            elapsed
        }
    }

    /// Start-to-end duration of a finished workout.
    pub fn duration(&self) -> Option<SignedDuration> {
        self.end_time.map(|end| end.duration_since(self.start_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(seconds: i64) -> Timestamp {
        Timestamp::new(seconds, 0).unwrap()
    }

    #[test]
    fn new_log_has_one_zeroed_set() {
        let log = ExerciseLog::new(ExerciseId::new("2"));

        assert_eq!(log.sets.len(), 1);
        assert_eq!(log.sets[0].weight, 0.0);
        assert_eq!(log.sets[0].reps, 0);
        assert!(!log.sets[0].completed);
    }

    #[test]
    fn next_set_copies_last_but_not_completion() {
        let mut log = ExerciseLog::new(ExerciseId::new("2"));
        log.sets[0].weight = 80.0;
        log.sets[0].reps = 8;
        log.sets[0].completed = true;

        let next = log.next_set();
        assert_eq!(next.weight, 80.0);
        assert_eq!(next.reps, 8);
        assert!(!next.completed);
        assert_ne!(next.id, log.sets[0].id);
    }

    #[test]
    fn next_set_on_empty_log_is_zeroed() {
        let mut log = ExerciseLog::new(ExerciseId::new("2"));
        log.sets.clear();

        let next = log.next_set();
        assert_eq!(next.weight, 0.0);
        assert_eq!(next.reps, 0);
    }

    #[test]
    fn apply_replaces_only_the_named_field() {
        let mut set = Set::new(20.0, 10);

        set.apply(SetField::Reps(12));
        assert_eq!((set.weight, set.reps, set.completed), (20.0, 12, false));

        set.apply(SetField::Completed(true));
        assert_eq!((set.weight, set.reps, set.completed), (20.0, 12, true));
    }

    #[test]
    fn elapsed_clamps_at_zero() {
        let workout = Workout::start(ts(1_000));

        assert_eq!(workout.elapsed(ts(1_125)), SignedDuration::from_secs(125));
        assert_eq!(workout.elapsed(ts(900)), SignedDuration::ZERO);
    }

    #[test]
    fn active_workout_omits_end_time() {
        let workout = Workout::start(ts(1_000));
        let json = serde_json::to_value(&workout).unwrap();

        assert!(json.get("endTime").is_none());
        assert_eq!(json["startTime"], "1970-01-01T00:16:40Z");
    }

    #[test]
    fn decodes_browser_style_timestamps() {
        let json = r#"{
            "id": "0b5c5f4e-2a7e-4a8f-9d55-1f0d8a9b7c11",
            "startTime": "2024-03-01T17:00:00.000Z",
            "endTime": "2024-03-01T18:05:30.250Z",
            "exercises": []
        }"#;
        let workout: Workout = serde_json::from_str(json).unwrap();

        assert_eq!(
            workout.duration(),
            Some(SignedDuration::new(3_930, 250_000_000))
        );
    }
}
