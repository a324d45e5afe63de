//! Resolving user-typed references to ids.
//!
//! Ids are long; every command accepts a full id or an unambiguous prefix.
//! Exercises can also be named.

use uuid::Uuid;

use crate::model::{Exercise, ExerciseId, ExerciseLog, Workout};

/// Resolve an exercise reference: exact id, then exact name (case-insensitive),
/// then id prefix.
pub(super) fn exercise<'a>(catalog: &'a [Exercise], reference: &str) -> Result<&'a Exercise, String> {
    if let Some(e) = catalog.iter().find(|e| e.id.as_str() == reference) {
        return Ok(e);
    }
    if let Some(e) = catalog
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(reference.trim()))
    {
        return Ok(e);
    }
    unique_prefix(catalog, reference, "exercise", |e| e.id.as_str().to_string())
}

/// Resolve a reference to an exercise id that may no longer be in the catalog.
///
/// Falls back to treating the reference as a raw id, so deleted exercises
/// can still be looked up in history.
pub(super) fn exercise_id(catalog: &[Exercise], reference: &str) -> ExerciseId {
    exercise(catalog, reference).map_or_else(|_| ExerciseId::new(reference), |e| e.id.clone())
}

/// Resolve a log in the active workout.
pub(super) fn log<'a>(workout: &'a Workout, reference: &str) -> Result<&'a ExerciseLog, String> {
    unique_prefix(&workout.exercises, reference, "exercise log", |l| l.id.to_string())
}

/// Resolve a set within a log.
pub(super) fn set(log: &ExerciseLog, reference: &str) -> Result<Uuid, String> {
    unique_prefix(&log.sets, reference, "set", |s| s.id.to_string()).map(|s| s.id)
}

fn unique_prefix<'a, T>(
    items: &'a [T],
    reference: &str,
    noun: &str,
    id: impl Fn(&T) -> String,
) -> Result<&'a T, String> {
    if reference.is_empty() {
        return Err(format!("empty {noun} reference"));
    }
    let matches: Vec<&T> = items
        .iter()
        .filter(|item| id(*item).starts_with(reference))
        .collect();

    match matches.as_slice() {
        [] => Err(format!("no {noun} matching '{reference}'")),
        [only] => Ok(*only),
        many => {
            let ids: Vec<String> = many.iter().map(|item| short(&id(*item))).collect();
            Err(format!(
                "'{reference}' is ambiguous — matches {} {noun}s: {}",
                many.len(),
                ids.join(", ")
            ))
        }
    }
}

/// First eight characters of an id, for display.
pub(super) fn short(id: &str) -> String {
    id.chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    use crate::model::default_catalog;

    #[test]
    fn exercise_by_id_then_name() {
        let catalog = default_catalog();

        assert_eq!(exercise(&catalog, "2").unwrap().name, "Squat");
        assert_eq!(exercise(&catalog, "squat").unwrap().id.as_str(), "2");
    }

    #[test]
    fn unknown_exercise_fails() {
        let catalog = default_catalog();
        let err = exercise(&catalog, "Zercher").unwrap_err();

        assert_eq!(err, "no exercise matching 'Zercher'");
    }

    #[test]
    fn dangling_exercise_id_falls_back_to_raw() {
        let catalog = default_catalog();

        assert_eq!(exercise_id(&catalog, "deleted-id"), ExerciseId::new("deleted-id"));
        assert_eq!(exercise_id(&catalog, "Deadlift"), ExerciseId::new("3"));
    }

    #[test]
    fn log_by_prefix() {
        let mut workout = Workout::start(Timestamp::UNIX_EPOCH);
        workout.exercises.push(ExerciseLog::new(ExerciseId::new("1")));
        let id = workout.exercises[0].id.to_string();

        assert_eq!(log(&workout, &id[..6]).unwrap().id.to_string(), id);
        assert!(log(&workout, "").is_err());
    }

    #[test]
    fn ambiguous_prefix_lists_candidates() {
        let items = ["abc1", "abc2", "xyz"];
        let err = unique_prefix(&items, "abc", "thing", |s| (*s).to_string()).unwrap_err();

        assert_eq!(err, "'abc' is ambiguous — matches 2 things: abc1, abc2");
    }
}
