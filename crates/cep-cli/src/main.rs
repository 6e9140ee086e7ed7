//! `cep-cli`: thin wiring around `cep-core`. Loads a schema and engine
//! tuning from a TOML config file, then runs one insert/select command,
//! or serves a stdin-driven insert loop until EOF or a shutdown signal.

mod cli;
mod config;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use cep_core::CepEngine;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Command};
use config::CliConfig;

fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();

    if matches!(cli.command, Command::Version) {
        io::stdout().write_all(cep_core::version().as_bytes())?;
        io::stdout().write_all(b"\n")?;
        return Ok(());
    }

    let config_path = cli
        .config
        .as_deref()
        .context("--config is required for every subcommand except 'version'")?;
    let config = CliConfig::load(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    let catalog = config.catalog()?;

    let mut engine = CepEngine::new(&config.database_name, catalog)?;
    if let Some(max_record) = config.engine.max_record {
        engine.set_max_record(max_record)?;
    }
    if let Some(vacuum_record) = config.engine.vacuum_record {
        engine.set_vacuum_record(vacuum_record);
    }
    if let Some(persistence) = config.engine.persistence {
        engine.set_persistence(persistence);
    }

    info!(database = engine.database_name(), "engine ready");

    let engine = Arc::new(Mutex::new(Some(engine)));
    install_shutdown_handler(Arc::clone(&engine));

    match cli.command {
        Command::Insert { table, csv_file } => {
            let csv = read_payload(&csv_file)?;
            let mut guard = lock(&engine)?;
            let Some(engine) = guard.as_mut() else {
                warn!("engine already shut down, dropping insert");
                return Ok(());
            };
            let inserted = engine.insert_csv(&table, &csv)?;
            info!(table = %table, inserted, "insert complete");
        }
        Command::Select { sql } => {
            let guard = lock(&engine)?;
            let Some(engine) = guard.as_ref() else {
                warn!("engine already shut down, dropping select");
                return Ok(());
            };
            if let Some(csv) = engine.select(&sql)? {
                io::stdout().write_all(csv.as_bytes())?;
            }
        }
        Command::Serve => run_serve_loop(&engine)?,
        Command::Version => {}
    }

    shutdown(&engine)?;
    Ok(())
}

/// Read `table\tpath` lines from stdin and insert each, until EOF or the
/// engine is taken by the shutdown handler.
fn run_serve_loop(engine: &Arc<Mutex<Option<CepEngine>>>) -> Result<()> {
    let stdin = io::stdin();
    for line in stdin.lines() {
        let line = line.context("reading stdin")?;
        let Some((table, path)) = line.split_once('\t') else {
            warn!(line = %line, "ignoring malformed serve line, expected 'table<TAB>path'");
            continue;
        };

        let csv = match read_payload(Path::new(path)) {
            Ok(csv) => csv,
            Err(e) => {
                error!(path, error = %e, "failed to read csv payload, skipping line");
                continue;
            }
        };

        let mut guard = lock(engine)?;
        let Some(engine) = guard.as_mut() else {
            info!("engine shut down mid-serve, stopping loop");
            break;
        };
        match engine.insert_csv(table, &csv) {
            Ok(inserted) => info!(table, inserted, "serve insert complete"),
            Err(e) => error!(table, error = %e, "serve insert failed"),
        }
    }
    Ok(())
}

fn read_payload(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("reading csv payload from stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("reading csv payload from {}", path.display()))
}

fn lock(engine: &Arc<Mutex<Option<CepEngine>>>) -> Result<std::sync::MutexGuard<'_, Option<CepEngine>>> {
    engine
        .lock()
        .map_err(|_| anyhow::anyhow!("engine mutex poisoned by a panicking thread"))
}

/// Flush and close the engine if the shutdown handler hasn't already
/// taken it.
fn shutdown(engine: &Arc<Mutex<Option<CepEngine>>>) -> Result<()> {
    let taken = lock(engine)?.take();
    if let Some(engine) = taken {
        engine.shutdown()?;
        info!("engine shut down cleanly");
    }
    Ok(())
}

/// Install a `SIGINT`/`SIGTERM` handler that takes the engine, flushes
/// every remaining staged row to the file database, and closes it
/// (mirroring the signal-triggered teardown of the engine this CLI wraps).
fn install_shutdown_handler(engine: Arc<Mutex<Option<CepEngine>>>) {
    let result = ctrlc::set_handler(move || {
        info!("shutdown signal received, flushing engine");
        let taken = match engine.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(engine) = taken {
            if let Err(e) = engine.shutdown() {
                error!(error = %e, "error flushing engine during shutdown");
            }
        }
    });
    if let Err(e) = result {
        warn!(error = %e, "failed to install shutdown signal handler");
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("initializing tracing subscriber")?;
    Ok(())
}
