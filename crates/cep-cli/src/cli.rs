//! Command-line argument shape.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line front end for the CEP engine.
#[derive(Debug, Parser)]
#[command(name = "cep-cli", about = "Insert and query a CSV-backed CEP engine", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file describing the schema and
    /// engine tuning. Required for every subcommand except `version`.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands `cep-cli` supports.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Insert one CSV payload (header line plus data rows) into a table.
    Insert {
        /// The target table, as declared in the config's `[tables]`.
        table: String,
        /// Path to a file containing the CSV payload, or `-` for stdin.
        csv_file: PathBuf,
    },
    /// Run a read-only `SELECT` against the in-memory window and print
    /// its result as CSV.
    Select {
        /// The `SELECT` statement to run.
        sql: String,
    },
    /// Read `table\tcsv_file` lines from stdin and insert each, until
    /// EOF or a shutdown signal, flushing every staged row before
    /// exiting.
    Serve,
    /// Print the engine's version string and exit without touching any
    /// database.
    Version,
}
