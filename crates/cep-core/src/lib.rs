//! Two-tier CSV ingestion pipeline over SQLite.
//!
//! An engine owns a bounded in-memory "hot" window per table and, when
//! persistence is enabled, spills evicted rows into a file-backed "cold"
//! store under `$HOME/.m2m/cep/`. Rows arrive and leave as CSV; there is
//! no quoting layer, so values must not themselves contain `,`, `\r`, or
//! `\n`.
//!
//! The pipeline for one [`engine::CepEngine::insert_csv`] call is:
//! stage → flush into the memory DB → evict the target table's excess →
//! spill every table's excess to the file DB → vacuum if due.

pub mod catalog;
pub mod column;
pub mod csv_codec;
pub mod engine;
pub mod engine_config;
pub mod error;
pub mod sql_runner;
pub mod staging;

pub use catalog::Catalog;
pub use column::{Column, ColumnList, ColumnType};
pub use engine::CepEngine;
pub use error::{CepError, CepResult};

/// The crate's version string, matching the engine's on-disk format
/// version.
#[must_use]
pub fn version() -> &'static str {
    "0.4.1"
}
