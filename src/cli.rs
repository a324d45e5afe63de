//! CLI interface for liftlog.
//!
//! Each subcommand is one user action against the workout store:
//! arguments in, a line or two of output out. Ids can be given as an
//! unambiguous prefix; exercises can also be given by name.
//!
//! - `liftlog workout start|show|add|add-set|set|remove-set|finish|cancel`
//! - `liftlog exercise list|add|delete`
//! - `liftlog history`
//! - `liftlog analytics split|progress`

mod format;
mod resolve;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::analytics;
use crate::config::Backend;
use crate::model::{BodyPart, SetField};
use crate::storage::KeyValueStore;
use crate::store::{self, Outcome, StoreError, WorkoutStore};

use format::{
    bar, format_body_parts, format_date, format_duration, format_elapsed, format_weight,
};
use resolve::short;

/// liftlog — log your lifts.
#[derive(Debug, Parser)]
#[command(name = "liftlog", version, after_long_help = WORKFLOW_HELP)]
pub struct Cli {
    /// More log output: -v info, -vv debug, -vvv trace.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory (overrides `data-dir` in the config file).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage backend (overrides `backend` in the config file).
    #[arg(long, value_enum, global = true)]
    pub backend: Option<BackendArg>,

    #[command(subcommand)]
    pub command: Command,
}

const WORKFLOW_HELP: &str = r"Workflow: logging a session
  1. liftlog workout start
  2. liftlog workout add squat
     → prints the exercise log ID (e.g. 3f2a9c1d)
  3. liftlog workout set 3f2 <set> --weight 100 --reps 5 --done
  4. liftlog workout add-set 3f2
  5. liftlog workout finish

Review:
  liftlog history --limit 3
  liftlog analytics split
  liftlog analytics progress squat";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the workout in progress.
    Workout {
        #[command(subcommand)]
        command: WorkoutCommand,
    },

    /// Manage the exercise catalog.
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommand,
    },

    /// List finished workouts, most recent first.
    History {
        /// Show at most this many workouts.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Aggregates over finished workouts.
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum WorkoutCommand {
    /// Start a new workout.
    ///
    /// An unfinished workout already in progress is discarded.
    Start {
        /// Routine to follow. Accepted but not used yet.
        #[arg(long)]
        routine: Option<String>,
    },

    /// Show the workout in progress.
    Show,

    /// Add an exercise to the workout. Prints the exercise log ID.
    Add {
        /// Exercise ID, ID prefix, or name.
        exercise: String,
    },

    /// Add a set to an exercise log, copying the previous set's weight and reps.
    AddSet {
        /// Exercise log ID or prefix.
        log: String,
    },

    /// Edit a set.
    Set {
        /// Exercise log ID or prefix.
        log: String,

        /// Set ID or prefix.
        set: String,

        #[arg(long, value_parser = parse_weight)]
        weight: Option<f64>,

        #[arg(long)]
        reps: Option<u32>,

        /// Mark the set completed.
        #[arg(long, conflicts_with = "undone")]
        done: bool,

        /// Mark the set not completed.
        #[arg(long)]
        undone: bool,
    },

    /// Remove a set from an exercise log.
    RemoveSet {
        /// Exercise log ID or prefix.
        log: String,

        /// Set ID or prefix.
        set: String,
    },

    /// Finish the workout and move it to history.
    Finish,

    /// Discard the workout.
    Cancel,
}

#[derive(Debug, Subcommand)]
pub enum ExerciseCommand {
    /// List the catalog.
    List,

    /// Add an exercise. Prints its ID.
    Add {
        /// Display name.
        name: String,

        /// Body part worked. Repeat for several.
        #[arg(long = "part", value_enum, required = true)]
        parts: Vec<BodyPartArg>,
    },

    /// Delete an exercise. Past workouts keep their entries.
    Delete {
        /// Exercise ID, ID prefix, or name.
        exercise: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum AnalyticsCommand {
    /// Completed sets per body part.
    Split,

    /// Heaviest completed set per workout for one exercise.
    Progress {
        /// Exercise ID, ID prefix, or name.
        exercise: String,
    },
}

/// CLI-facing backend, mapped to the config `Backend`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BackendArg {
    /// One JSON file per key.
    Json,
    /// A single SQLite database.
    Sqlite,
}

impl BackendArg {
    pub fn to_domain(self) -> Backend {
        match self {
            Self::Json => Backend::Json,
            Self::Sqlite => Backend::Sqlite,
        }
    }
}

/// CLI-facing body part, mapped to the domain `BodyPart`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BodyPartArg {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
}

impl BodyPartArg {
    fn to_domain(self) -> BodyPart {
        match self {
            Self::Chest => BodyPart::Chest,
            Self::Back => BodyPart::Back,
            Self::Legs => BodyPart::Legs,
            Self::Shoulders => BodyPart::Shoulders,
            Self::Arms => BodyPart::Arms,
            Self::Core => BodyPart::Core,
        }
    }
}

/// Parses `--weight`, refusing values that cannot be stored.
fn parse_weight(raw: &str) -> Result<f64, String> {
    let weight: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if weight.is_finite() {
        Ok(weight)
    } else {
        Err(format!("'{raw}' is not a finite number"))
    }
}

/// Run one command against the store, returning an error message on failure.
pub fn run<S: KeyValueStore>(command: Command, store: &mut WorkoutStore<S>) -> Result<(), String> {
    match command {
        Command::Workout { command } => match command {
            WorkoutCommand::Start { routine } => cmd_start(store, routine.as_deref()),
            WorkoutCommand::Show => cmd_show(store),
            WorkoutCommand::Add { exercise } => cmd_add(store, &exercise),
            WorkoutCommand::AddSet { log } => cmd_add_set(store, &log),
            WorkoutCommand::Set {
                log,
                set,
                weight,
                reps,
                done,
                undone,
            } => {
                let mut fields = Vec::new();
                fields.extend(weight.map(SetField::Weight));
                fields.extend(reps.map(SetField::Reps));
                if done || undone {
                    fields.push(SetField::Completed(done));
                }
                cmd_set(store, &log, &set, &fields)
            }
            WorkoutCommand::RemoveSet { log, set } => cmd_remove_set(store, &log, &set),
            WorkoutCommand::Finish => cmd_finish(store),
            WorkoutCommand::Cancel => {
                applied(store.cancel_workout())?;
                eprintln!("Workout discarded");
                Ok(())
            }
        },
        Command::Exercise { command } => match command {
            ExerciseCommand::List => {
                cmd_exercise_list(store);
                Ok(())
            }
            ExerciseCommand::Add { name, parts } => cmd_exercise_add(store, &name, &parts),
            ExerciseCommand::Delete { exercise } => cmd_exercise_delete(store, &exercise),
        },
        Command::History { limit } => {
            cmd_history(store, limit);
            Ok(())
        }
        Command::Analytics { command } => {
            match command {
                AnalyticsCommand::Split => cmd_split(store),
                AnalyticsCommand::Progress { exercise } => cmd_progress(store, &exercise),
            }
            Ok(())
        }
    }
}

/// Turn a mutation result into a CLI result.
///
/// Ignored commands are errors here: the user asked for something that did
/// not happen. A failed write is only a warning, since the change is live in
/// memory and `main` retries the write before exiting.
fn applied(result: store::Result<Outcome>) -> Result<(), String> {
    match result {
        Ok(Outcome::Applied) => Ok(()),
        Ok(Outcome::Ignored(reason)) => Err(format!("nothing to do: {reason}")),
        Err(e) => tolerate_unsaved(e),
    }
}

fn tolerate_unsaved(e: StoreError) -> Result<(), String> {
    match e {
        StoreError::PersistenceFailed(_) => {
            eprintln!("Warning: {e}");
            Ok(())
        }
        StoreError::InvalidArgument(_) => Err(e.to_string()),
    }
}

fn require_active<S: KeyValueStore>(
    store: &WorkoutStore<S>,
) -> Result<&crate::model::Workout, String> {
    store
        .active_workout()
        .ok_or_else(|| "no workout in progress — start one with `liftlog workout start`".to_string())
}

fn cmd_start<S: KeyValueStore>(
    store: &mut WorkoutStore<S>,
    routine: Option<&str>,
) -> Result<(), String> {
    if let Some(previous) = store.active_workout() {
        eprintln!(
            "Discarding unfinished workout started {}",
            format_date(previous.start_time)
        );
    }
    applied(store.start_workout(routine))?;
    let workout = require_active(store)?;
    println!("{}", workout.id);
    Ok(())
}

fn cmd_show<S: KeyValueStore>(store: &WorkoutStore<S>) -> Result<(), String> {
    let workout = require_active(store)?;
    println!(
        "Workout {}  started {}  ({})",
        short(&workout.id.to_string()),
        format_date(workout.start_time),
        format_elapsed(workout.elapsed(store.now()))
    );
    if workout.exercises.is_empty() {
        println!("  No exercises yet");
    }
    for log in &workout.exercises {
        println!(
            "\n  {}  {}",
            short(&log.id.to_string()),
            store.exercise_name(&log.exercise_id)
        );
        if log.sets.is_empty() {
            println!("      (no sets)");
        }
        for (i, set) in log.sets.iter().enumerate() {
            let mark = if set.completed { "x" } else { " " };
            println!(
                "    {:>2}. {}  {} x {}  [{mark}]",
                i + 1,
                short(&set.id.to_string()),
                format_weight(set.weight),
                set.reps
            );
        }
    }
    Ok(())
}

fn cmd_add<S: KeyValueStore>(store: &mut WorkoutStore<S>, reference: &str) -> Result<(), String> {
    require_active(store)?;
    let exercise = resolve::exercise(store.exercises(), reference)?;
    let (id, name) = (exercise.id.clone(), exercise.name.clone());

    applied(store.add_exercise_to_workout(&id))?;

    let log = require_active(store)?
        .exercises
        .last()
        .ok_or("exercise log missing after add")?;
    println!("{}", log.id);
    eprintln!("Added {name}");
    Ok(())
}

fn cmd_add_set<S: KeyValueStore>(store: &mut WorkoutStore<S>, log_ref: &str) -> Result<(), String> {
    let log_id = resolve::log(require_active(store)?, log_ref)?.id;

    applied(store.add_set(log_id))?;

    let set = require_active(store)?
        .log(log_id)
        .and_then(|log| log.sets.last())
        .ok_or("set missing after add")?;
    println!("{}", set.id);
    Ok(())
}

fn cmd_set<S: KeyValueStore>(
    store: &mut WorkoutStore<S>,
    log_ref: &str,
    set_ref: &str,
    fields: &[SetField],
) -> Result<(), String> {
    if fields.is_empty() {
        return Err("nothing to change: pass --weight, --reps, --done, or --undone".to_string());
    }
    let log = resolve::log(require_active(store)?, log_ref)?;
    let (log_id, set_id) = (log.id, resolve::set(log, set_ref)?);

    for &field in fields {
        applied(store.update_set(log_id, set_id, field))?;
    }
    Ok(())
}

fn cmd_remove_set<S: KeyValueStore>(
    store: &mut WorkoutStore<S>,
    log_ref: &str,
    set_ref: &str,
) -> Result<(), String> {
    let log = resolve::log(require_active(store)?, log_ref)?;
    let (log_id, set_id) = (log.id, resolve::set(log, set_ref)?);

    applied(store.remove_set(log_id, set_id))?;
    eprintln!("Set removed");
    Ok(())
}

fn cmd_finish<S: KeyValueStore>(store: &mut WorkoutStore<S>) -> Result<(), String> {
    applied(store.finish_workout())?;

    let workout = store.history().first().ok_or("history empty after finish")?;
    let summary = analytics::summarize(store.state(), workout);
    eprintln!(
        "Workout finished: {} exercise(s), {} completed set(s)",
        summary.entries.len(),
        summary.total_completed_sets()
    );
    Ok(())
}

fn cmd_exercise_list<S: KeyValueStore>(store: &WorkoutStore<S>) {
    if store.exercises().is_empty() {
        println!("No exercises");
        return;
    }
    for e in store.exercises() {
        println!(
            "{:<8}  {:<20}  {}",
            short(e.id.as_str()),
            e.name,
            format_body_parts(&e.body_parts)
        );
    }
}

fn cmd_exercise_add<S: KeyValueStore>(
    store: &mut WorkoutStore<S>,
    name: &str,
    parts: &[BodyPartArg],
) -> Result<(), String> {
    if let Err(e) = store.add_exercise(name, parts.iter().map(|p| p.to_domain())) {
        tolerate_unsaved(e)?;
    }
    let added = store.exercises().last().ok_or("catalog empty after add")?;
    println!("{}", added.id);
    Ok(())
}

fn cmd_exercise_delete<S: KeyValueStore>(
    store: &mut WorkoutStore<S>,
    reference: &str,
) -> Result<(), String> {
    let exercise = resolve::exercise(store.exercises(), reference)?;
    let (id, name) = (exercise.id.clone(), exercise.name.clone());

    applied(store.delete_exercise(&id))?;
    eprintln!("Deleted {name}");
    Ok(())
}

fn cmd_history<S: KeyValueStore>(store: &WorkoutStore<S>, limit: Option<usize>) {
    let workouts = match limit {
        Some(n) => store.recent_workouts(n),
        None => store.history(),
    };
    if workouts.is_empty() {
        println!("No workouts yet");
        return;
    }

    for workout in workouts {
        let summary = analytics::summarize(store.state(), workout);
        let duration = summary
            .duration
            .map(format_duration)
            .unwrap_or_default();
        println!(
            "{}  {}  {duration}",
            short(&summary.id.to_string()),
            format_date(summary.started_at)
        );
        for entry in &summary.entries {
            println!("    {} ({} sets)", entry.name, entry.completed_sets);
        }
    }
}

fn cmd_split<S: KeyValueStore>(store: &WorkoutStore<S>) {
    let split = analytics::training_split(store.state());
    let Some(&max) = split.values().max() else {
        println!("No data yet");
        return;
    };
    for (part, count) in &split {
        println!(
            "{:<10} {count:>4}  {}",
            part.as_str(),
            bar(*count as f64, max as f64, 30)
        );
    }
}

fn cmd_progress<S: KeyValueStore>(store: &WorkoutStore<S>, reference: &str) {
    let id = resolve::exercise_id(store.exercises(), reference);
    let series = analytics::progress_series(store.state(), &id);
    println!("{}", store.exercise_name(&id));

    let max = series.iter().map(|p| p.max_weight).fold(0.0, f64::max);
    if series.is_empty() {
        println!("  No completed sets yet");
    }
    for point in &series {
        println!(
            "  {}  {:>7}  {}",
            format_date(point.date),
            format_weight(point.max_weight),
            bar(point.max_weight, max, 30)
        );
    }
}
