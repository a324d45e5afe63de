//! Persisted document format and schema migrations.
//!
//! The state is stored as one JSON object: the [`RootState`] fields plus a
//! `schemaVersion` number. Documents written before versioning existed carry
//! no version and are treated as version 0.
//!
//! Migrations run on raw JSON, in order, one version step at a time, before
//! the typed decode. A document that cannot be brought up to
//! [`CURRENT_VERSION`] is rejected as a whole.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::RootState;

/// The version this build reads and writes.
pub const CURRENT_VERSION: u64 = 1;

const VERSION_KEY: &str = "schemaVersion";

/// Errors that can occur while decoding a stored document.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("schema version {found} is newer than the supported version {supported}")]
    UnsupportedVersion { found: u64, supported: u64 },

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, SchemaError>;

/// Maps a document from version N to N+1. Index N in [`MIGRATIONS`].
type Migration = fn(Map<String, Value>) -> Result<Map<String, Value>>;

const MIGRATIONS: &[Migration] = &[body_part_to_body_parts];

/// A successfully decoded document.
#[derive(Debug)]
pub struct Decoded {
    pub state: RootState,

    /// The version the document was stored at, when migrations ran.
    pub migrated_from: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Document<'a> {
    schema_version: u64,

    #[serde(flatten)]
    state: &'a RootState,
}

/// Serializes the state at the current schema version.
pub fn encode(state: &RootState) -> serde_json::Result<String> {
    serde_json::to_string(&Document {
        schema_version: CURRENT_VERSION,
        state,
    })
}

/// Parses a stored document, migrating it to the current version first.
pub fn decode(raw: &str) -> Result<Decoded> {
    let Value::Object(mut doc) = serde_json::from_str(raw)? else {
        return Err(SchemaError::Malformed("document is not an object".into()));
    };

    let version = match doc.remove(VERSION_KEY) {
        None => 0,
        Some(v) => v.as_u64().ok_or_else(|| {
            SchemaError::Malformed(format!("{VERSION_KEY} is not a version number: {v}"))
        })?,
    };
    if version > CURRENT_VERSION {
        return Err(SchemaError::UnsupportedVersion {
            found: version,
            supported: CURRENT_VERSION,
        });
    }

    for migration in &MIGRATIONS[usize::try_from(version).unwrap_or(usize::MAX)..] {
        doc = migration(doc)?;
    }

    let state = serde_json::from_value(Value::Object(doc))?;
    Ok(Decoded {
        state,
        migrated_from: (version < CURRENT_VERSION).then_some(version),
    })
}

/// 0 → 1: a catalog entry's single `bodyPart` becomes a `bodyParts` set.
///
/// Entries without a tag get an empty set. Entries already carrying
/// `bodyParts` are left alone. The never-used `routines` list is dropped.
/// Set numbers typed as free-form input are brought into range: reps become
/// whole and non-negative, a `null` weight (an unparsable entry) becomes 0.
fn body_part_to_body_parts(mut doc: Map<String, Value>) -> Result<Map<String, Value>> {
    let Some(Value::Array(exercises)) = doc.get_mut("exercises") else {
        return Err(SchemaError::Malformed("exercises is not a list".into()));
    };

    for entry in exercises {
        let Value::Object(entry) = entry else {
            return Err(SchemaError::Malformed("exercise is not an object".into()));
        };
        let legacy = entry.remove("bodyPart");
        if entry.contains_key("bodyParts") {
            continue;
        }
        let parts = match legacy {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(part)) if part.is_empty() => Vec::new(),
            Some(part @ Value::String(_)) => vec![part],
            Some(other) => {
                return Err(SchemaError::Malformed(format!(
                    "bodyPart is not a string: {other}"
                )));
            }
        };
        entry.insert("bodyParts".into(), Value::Array(parts));
    }

    if let Some(Value::Array(history)) = doc.get_mut("history") {
        history.iter_mut().for_each(coerce_set_numbers);
    }
    if let Some(active) = doc.get_mut("activeWorkout") {
        coerce_set_numbers(active);
    }

    doc.remove("routines");
    Ok(doc)
}

fn coerce_set_numbers(workout: &mut Value) {
    let Some(logs) = workout.get_mut("exercises").and_then(Value::as_array_mut) else {
        return;
    };
    let sets = logs
        .iter_mut()
        .filter_map(|log| log.get_mut("sets").and_then(Value::as_array_mut))
        .flatten();

    for set in sets {
        let Value::Object(set) = set else { continue };
        if let Some(reps) = set.get_mut("reps") {
            *reps = Value::from(whole_reps(reps));
        }
        if let Some(weight) = set.get_mut("weight")
            && !weight.as_f64().is_some_and(f64::is_finite)
        {
            *weight = Value::from(0.0);
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_reps(reps: &Value) -> u32 {
    match reps.as_f64() {
        Some(n) if n.is_finite() => n.trunc().clamp(0.0, f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeSet;

    use serde_json::json;

    use crate::model::{BodyPart, ExerciseId, ExerciseLog, Set, Workout};

    fn legacy_document() -> String {
        json!({
            "exercises": [
                { "id": "1", "name": "Bench Press", "bodyPart": "Chest" },
                { "id": "9", "name": "Farmer Carry" },
                { "id": "10", "name": "Plank", "bodyPart": null }
            ],
            "history": [],
            "routines": [],
            "activeWorkout": null
        })
        .to_string()
    }

    fn populated_state() -> RootState {
        let start = jiff::Timestamp::new(1_700_000_000, 0).unwrap();
        let mut finished = Workout::start(start);
        let mut log = ExerciseLog::new(ExerciseId::new("2"));
        log.sets[0] = Set {
            completed: true,
            ..Set::new(100.0, 5)
        };
        finished.exercises.push(log);
        finished.end_time = Some(start + jiff::SignedDuration::from_mins(45));

        let mut state = RootState::default();
        state.history.push(finished);
        state.active_workout = Some(Workout::start(start + jiff::SignedDuration::from_hours(24)));
        state
    }

    #[test]
    fn encode_stamps_current_version() {
        let raw = encode(&RootState::default()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value[VERSION_KEY], CURRENT_VERSION);
        assert!(value["exercises"].is_array());
    }

    #[test]
    fn round_trip_is_lossless() {
        let state = populated_state();

        let decoded = decode(&encode(&state).unwrap()).unwrap();

        assert_eq!(decoded.state, state);
        assert_eq!(decoded.migrated_from, None);
    }

    #[test]
    fn legacy_body_part_becomes_set() {
        let decoded = decode(&legacy_document()).unwrap();
        let exercises = &decoded.state.exercises;

        assert_eq!(decoded.migrated_from, Some(0));
        assert_eq!(exercises[0].body_parts, BTreeSet::from([BodyPart::Chest]));
        assert!(exercises[1].body_parts.is_empty());
        assert!(exercises[2].body_parts.is_empty());
    }

    #[test]
    fn legacy_free_form_set_numbers_are_coerced() {
        let set = |id: &str, weight: Value, reps: Value| {
            json!({ "id": id, "weight": weight, "reps": reps, "completed": true })
        };
        let raw = json!({
            "exercises": [{ "id": "2", "name": "Squat", "bodyPart": "Legs" }],
            "history": [{
                "id": "6f1c1d7e-2a3b-4c5d-8e9f-0a1b2c3d4e5f",
                "startTime": "2024-03-01T18:00:00.000Z",
                "endTime": "2024-03-01T19:00:00.000Z",
                "exercises": [{
                    "id": "0b7e6a1c-9d2f-4e3a-8b5c-1d2e3f4a5b6c",
                    "exerciseId": "2",
                    "sets": [
                        set("a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d", json!(100), json!(5.7)),
                        set("b2c3d4e5-f6a7-4b8c-9d0e-1f2a3b4c5d6e", json!(null), json!(-3)),
                        set("c3d4e5f6-a7b8-4c9d-8e1f-2a3b4c5d6e7f", json!(80.5), json!(null))
                    ]
                }]
            }],
            "activeWorkout": null
        })
        .to_string();

        let decoded = decode(&raw).unwrap();
        let sets = &decoded.state.history[0].exercises[0].sets;

        assert_eq!((sets[0].weight, sets[0].reps), (100.0, 5));
        assert_eq!((sets[1].weight, sets[1].reps), (0.0, 0));
        assert_eq!((sets[2].weight, sets[2].reps), (80.5, 0));
    }

    #[test]
    fn current_version_sets_are_not_coerced() {
        let mut value: Value = serde_json::from_str(&encode(&populated_state()).unwrap()).unwrap();
        value["history"][0]["exercises"][0]["sets"][0]["reps"] = json!(4.5);

        assert!(decode(&value.to_string()).is_err());
    }

    #[test]
    fn migrated_shape_round_trips_without_remigrating() {
        let first = decode(&legacy_document()).unwrap();
        let second = decode(&encode(&first.state).unwrap()).unwrap();

        assert_eq!(second.migrated_from, None);
        assert_eq!(second.state, first.state);
    }

    #[test]
    fn unversioned_document_with_sets_is_kept() {
        let raw = json!({
            "exercises": [
                { "id": "1", "name": "Push Up", "bodyParts": ["Arms", "Chest"] }
            ],
            "history": [],
            "activeWorkout": null
        })
        .to_string();

        let decoded = decode(&raw).unwrap();
        assert_eq!(
            decoded.state.exercises[0].body_parts,
            BTreeSet::from([BodyPart::Chest, BodyPart::Arms])
        );
    }

    #[test]
    fn newer_version_is_rejected() {
        let raw = json!({ "schemaVersion": 99, "exercises": [], "history": [] }).to_string();
        let err = decode(&raw).unwrap_err();

        assert!(matches!(
            err,
            SchemaError::UnsupportedVersion { found: 99, .. }
        ));
    }

    #[test]
    fn non_object_is_rejected() {
        let err = decode("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, SchemaError::Malformed(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = decode("{not json").unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));
    }

    #[test]
    fn missing_catalog_is_rejected() {
        let raw = json!({ "history": [] }).to_string();
        let err = decode(&raw).unwrap_err();

        assert!(matches!(err, SchemaError::Malformed(_)));
    }

    #[test]
    fn unknown_body_part_is_rejected() {
        let raw = json!({
            "exercises": [{ "id": "1", "name": "Calf Raise", "bodyPart": "Calves" }],
            "history": []
        })
        .to_string();

        let err = decode(&raw).unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));
    }
}
