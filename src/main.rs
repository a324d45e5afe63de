mod analytics;
mod cli;
mod config;
mod logging;
mod model;
mod schema;
mod storage;
mod store;

use std::process;

use clap::Parser;

use cli::Cli;
use config::{Backend, Config};
use storage::{FileStore, KeyValueStore, SqliteStore};
use store::WorkoutStore;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{e}");
    }

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let backend = open_backend(&cli, &config).unwrap_or_else(|e| {
        eprintln!("Failed to initialize storage: {e}");
        process::exit(1);
    });

    let mut store = match WorkoutStore::open(backend, config.storage_key.as_str()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load workout data: {e}");
            process::exit(1);
        }
    };

    let result = cli::run(cli.command, &mut store);

    if store.is_dirty()
        && let Err(e) = store.flush()
    {
        eprintln!("Error: {e}");
        eprintln!("The last change was not written to disk and is lost.");
        process::exit(1);
    }

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Opens the configured backend, with command-line flags taking precedence.
fn open_backend(cli: &Cli, config: &Config) -> Result<Box<dyn KeyValueStore>, String> {
    let root = cli
        .data_dir
        .clone()
        .or_else(|| config.data_dir())
        .ok_or("could not determine home directory; pass --data-dir")?;
    let backend = cli.backend.map_or(config.backend, cli::BackendArg::to_domain);

    let store: Box<dyn KeyValueStore> = match backend {
        Backend::Json => Box::new(FileStore::new(root).map_err(|e| e.to_string())?),
        Backend::Sqlite => Box::new(SqliteStore::new(root).map_err(|e| e.to_string())?),
    };
    Ok(store)
}
