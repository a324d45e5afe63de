//! Derived views over history: training split, progress, and workout summaries.
//!
//! Everything here is recomputed from the state on every call; nothing is cached.
//! Only completed sets count.

use std::collections::BTreeMap;

use jiff::{SignedDuration, Timestamp};
use uuid::Uuid;

use crate::model::{BodyPart, ExerciseId, RootState, Workout};

/// Completed sets per body part across all of history.
///
/// An exercise tagged with several body parts counts in full toward each.
/// Logs whose exercise is no longer in the catalog contribute nothing.
pub fn training_split(state: &RootState) -> BTreeMap<BodyPart, usize> {
    let mut counts = BTreeMap::new();
    for log in state.history.iter().flat_map(|w| &w.exercises) {
        let Some(exercise) = state.exercise(&log.exercise_id) else {
            continue;
        };
        let completed = log.completed_sets().count();
        for &part in &exercise.body_parts {
            *counts.entry(part).or_insert(0) += completed;
        }
    }
    counts
}

/// One point of an exercise's progress: the heaviest completed set of a workout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressPoint {
    pub date: Timestamp,
    pub max_weight: f64,
}

/// The heaviest completed weight per workout for one exercise, oldest first.
///
/// Workouts where the exercise has no completed sets are left out rather
/// than plotted as zero.
pub fn progress_series(state: &RootState, exercise_id: &ExerciseId) -> Vec<ProgressPoint> {
    let mut workouts: Vec<&Workout> = state.history.iter().collect();
    workouts.sort_by_key(|w| w.start_time);

    workouts
        .into_iter()
        .filter_map(|workout| {
            let log = workout.log_for(exercise_id)?;
            let max_weight = log.completed_sets().map(|s| s.weight).reduce(f64::max)?;
            Some(ProgressPoint {
                date: workout.start_time,
                max_weight,
            })
        })
        .collect()
}

/// A finished workout as the history list shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSummary {
    pub id: Uuid,
    pub started_at: Timestamp,
    pub duration: Option<SignedDuration>,
    pub entries: Vec<EntrySummary>,
}

/// One exercise line of a [`WorkoutSummary`].
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySummary {
    pub name: String,
    pub completed_sets: usize,
}

impl WorkoutSummary {
    pub fn total_completed_sets(&self) -> usize {
        self.entries.iter().map(|e| e.completed_sets).sum()
    }
}

/// Summarizes a workout, resolving exercise names against the current catalog.
pub fn summarize(state: &RootState, workout: &Workout) -> WorkoutSummary {
    WorkoutSummary {
        id: workout.id,
        started_at: workout.start_time,
        duration: workout.duration(),
        entries: workout
            .exercises
            .iter()
            .map(|log| EntrySummary {
                name: state.exercise_name(&log.exercise_id).to_string(),
                completed_sets: log.completed_sets().count(),
            })
            .collect(),
    }
}
