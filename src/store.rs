//! The workout store: sole owner of the state graph.
//!
//! One [`WorkoutStore`] is built per session around an injected
//! [`KeyValueStore`] and [`Clock`]. Every mutation runs to completion on
//! `&mut self`, then the whole state is written back under one key.
//!
//! Mutations that target something that no longer exists are not errors:
//! they return [`Outcome::Ignored`] and leave the state untouched.
//! A failed write is reported as [`StoreError::PersistenceFailed`], but the
//! in-memory transition has already happened and stays authoritative.

mod catalog;
mod session;

use std::fmt;

use jiff::Timestamp;
use tracing::{debug, info, warn};

use crate::model::{Exercise, RootState, Workout};
use crate::schema::{self, Decoded};
use crate::storage::{KeyValueStore, StorageError};

/// The key the state lives under unless configured otherwise.
pub const DEFAULT_KEY: &str = "liftlog.state";

/// Suffix of the key an unreadable document is copied to before it is replaced.
const UNREADABLE_SUFFIX: &str = ".unreadable";

/// Errors surfaced by store mutations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The change was applied in memory but could not be written.
    #[error("changes are not saved: {0}")]
    PersistenceFailed(#[source] StorageError),
}

pub type Result<T> = core::result::Result<T, StoreError>;

/// What a mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    Applied,
    Ignored(Ignored),
}

/// Why a mutation left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ignored {
    NoActiveWorkout,
    LogNotFound,
    SetNotFound,
    ExerciseNotFound,
}

impl fmt::Display for Ignored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Ignored::NoActiveWorkout => "no active workout",
            Ignored::LogNotFound => "exercise log not found in the active workout",
            Ignored::SetNotFound => "set not found",
            Ignored::ExerciseNotFound => "exercise not found in the catalog",
        })
    }
}

/// Source of "now".
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Owns the state and writes it through to a key-value backend.
pub struct WorkoutStore<S> {
    backend: S,
    key: String,
    clock: Box<dyn Clock>,
    state: RootState,
    dirty: bool,
}

impl<S: KeyValueStore> WorkoutStore<S> {
    /// Loads the state stored under `key`, using the system clock.
    ///
    /// See [`WorkoutStore::open_with_clock`].
    pub fn open(backend: S, key: impl Into<String>) -> core::result::Result<Self, StorageError> {
        Self::open_with_clock(backend, key, Box::new(SystemClock))
    }

    /// Loads the state stored under `key`.
    ///
    /// - Nothing stored: starts from [`RootState::default`] and writes it.
    /// - Older schema: migrates, then writes the migrated document back.
    /// - Unreadable document: copies it to `<key>.unreadable` and starts
    ///   from the default state.
    ///
    /// Only a failure to read from the backend is an error. A failed
    /// write-back leaves the store dirty; see [`WorkoutStore::flush`].
    pub fn open_with_clock(
        mut backend: S,
        key: impl Into<String>,
        clock: Box<dyn Clock>,
    ) -> core::result::Result<Self, StorageError> {
        let key = key.into();
        let (state, write_back) = load_state(&mut backend, &key)?;

        let mut store = Self {
            backend,
            key,
            clock,
            state,
            dirty: write_back,
        };
        if write_back && let Err(e) = store.persist() {
            warn!(error = %e, "could not write initial state");
        }
        Ok(store)
    }

    // ── Reads ──

    pub fn state(&self) -> &RootState {
        &self.state
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.state.exercises
    }

    /// Finished workouts, most recent first.
    pub fn history(&self) -> &[Workout] {
        &self.state.history
    }

    pub fn active_workout(&self) -> Option<&Workout> {
        self.state.active_workout.as_ref()
    }

    /// Up to `n` of the most recent finished workouts.
    pub fn recent_workouts(&self, n: usize) -> &[Workout] {
        &self.state.history[..n.min(self.state.history.len())]
    }

    /// The current time according to the store's clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    // ── Persistence ──

    /// Whether the last write failed and the backend is behind memory.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Retries writing the state if a previous write failed.
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty {
            self.persist()?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    #[cfg(test)]
    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Records the result of a mutation, writing the state if it changed.
    fn commit(&mut self, outcome: Outcome) -> Result<Outcome> {
        match outcome {
            Outcome::Applied => self.persist()?,
            Outcome::Ignored(reason) => info!(%reason, "command ignored"),
        }
        Ok(outcome)
    }

    fn persist(&mut self) -> Result<()> {
        let written = schema::encode(&self.state)
            .map_err(StorageError::from)
            .and_then(|doc| self.backend.put(&self.key, &doc));
        match written {
            Ok(()) => {
                self.dirty = false;
                debug!(key = %self.key, "state saved");
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                warn!(key = %self.key, error = %e, "state not saved");
                Err(StoreError::PersistenceFailed(e))
            }
        }
    }
}

/// Reads and decodes the stored state. The flag says whether it must be written back.
fn load_state<S: KeyValueStore>(
    backend: &mut S,
    key: &str,
) -> core::result::Result<(RootState, bool), StorageError> {
    let Some(raw) = backend.get(key)? else {
        info!(key, "no stored state, starting with the default catalog");
        return Ok((RootState::default(), true));
    };

    match schema::decode(&raw) {
        Ok(Decoded {
            state,
            migrated_from: None,
        }) => Ok((state, false)),
        Ok(Decoded {
            state,
            migrated_from: Some(from),
        }) => {
            info!(from, to = schema::CURRENT_VERSION, "migrated stored state");
            Ok((state, true))
        }
        Err(e) => {
            warn!(key, error = %e, "stored state is unreadable, starting from defaults");
            let backup = format!("{key}{UNREADABLE_SUFFIX}");
            match backend.put(&backup, &raw) {
                Ok(()) => {
                    warn!(backup = %backup, "unreadable state preserved");
                    Ok((RootState::default(), true))
                }
                Err(e) => {
                    // Without a copy, overwriting would destroy the only one.
                    warn!(error = %e, "could not preserve unreadable state");
                    Ok((RootState::default(), false))
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::Cell;

    use jiff::{SignedDuration, Timestamp};

    use super::{Clock, DEFAULT_KEY, WorkoutStore};
    use crate::storage::MemoryStore;

    /// A clock that advances one minute every time it is read.
    pub struct StepClock {
        next: Cell<Timestamp>,
    }

    impl StepClock {
        pub fn starting_at(seconds: i64) -> Self {
            Self {
                next: Cell::new(Timestamp::new(seconds, 0).unwrap()),
            }
        }
    }

    impl Clock for StepClock {
        fn now(&self) -> Timestamp {
            let now = self.next.get();
            self.next.set(now + SignedDuration::from_mins(1));
            now
        }
    }

    pub fn memory_store() -> WorkoutStore<MemoryStore> {
        WorkoutStore::open_with_clock(
            MemoryStore::new(),
            DEFAULT_KEY,
            Box::new(StepClock::starting_at(1_700_000_000)),
        )
        .unwrap()
    }
}
