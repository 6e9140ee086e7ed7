//! TOML-driven configuration: the schema to load and the engine tuning
//! to apply, read with the `config` crate the way the rest of the stack
//! reads its settings.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use cep_core::{Catalog, ColumnList, ColumnType};
use serde::Deserialize;

/// Top-level shape of a CLI configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Database name passed to `CepEngine::new` (the `.sqlite` suffix is
    /// added automatically if missing).
    pub database_name: String,
    /// Per-table column definitions, keyed by table name.
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<ColumnSpec>>,
    /// Engine tuning knobs; every field is optional and falls back to the
    /// engine's own defaults.
    #[serde(default)]
    pub engine: EngineSpec,
}

/// One column's configuration-file shape, mirroring [`cep_core::Column`].
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    /// The column's name.
    pub name: String,
    /// The column's declared type.
    #[serde(rename = "type")]
    pub column_type: ColumnTypeSpec,
    /// Whether this column is the table's primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Whether this column auto-increments.
    #[serde(default)]
    pub auto_increment: bool,
    /// Whether `NULL` is a legal value for this column.
    #[serde(default)]
    pub allow_null: bool,
    /// Whether this column carries a `UNIQUE` constraint.
    #[serde(default)]
    pub unique: bool,
}

/// Mirrors [`cep_core::ColumnType`] so it can be deserialized from a
/// lowercase TOML string.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnTypeSpec {
    /// `INTEGER`.
    Integer,
    /// `REAL`.
    Real,
    /// `TEXT`.
    Text,
    /// `BLOB`.
    Blob,
    /// `NUMERIC`.
    Numeric,
    /// `BOOL`.
    Bool,
    /// `DATETIME`.
    Datetime,
    /// `NULL`.
    Null,
}

impl From<ColumnTypeSpec> for ColumnType {
    fn from(spec: ColumnTypeSpec) -> Self {
        match spec {
            ColumnTypeSpec::Integer => Self::Integer,
            ColumnTypeSpec::Real => Self::Real,
            ColumnTypeSpec::Text => Self::Text,
            ColumnTypeSpec::Blob => Self::Blob,
            ColumnTypeSpec::Numeric => Self::Numeric,
            ColumnTypeSpec::Bool => Self::Bool,
            ColumnTypeSpec::Datetime => Self::Datetime,
            ColumnTypeSpec::Null => Self::Null,
        }
    }
}

/// Engine tuning knobs, all optional in the config file.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EngineSpec {
    /// Overrides [`cep_core::CepEngine::set_max_record`].
    pub max_record: Option<u32>,
    /// Overrides [`cep_core::CepEngine::set_vacuum_record`].
    pub vacuum_record: Option<u32>,
    /// Overrides [`cep_core::CepEngine::set_persistence`].
    pub persistence: Option<bool>,
}

impl CliConfig {
    /// Load and parse a TOML configuration file.
    ///
    /// # Errors
    /// Returns an error if `path` cannot be read or does not parse into
    /// the expected shape.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .with_context(|| format!("loading config from {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("parsing config from {}", path.display()))
    }

    /// Build the [`Catalog`] described by this config's `[tables]`
    /// section.
    ///
    /// # Errors
    /// Returns an error if a table's column list is empty.
    pub fn catalog(&self) -> Result<Catalog> {
        let mut catalog = Catalog::new();
        for (table_name, columns) in &self.tables {
            let mut list = ColumnList::new();
            for column in columns {
                list.append(
                    column.name.clone(),
                    column.column_type.into(),
                    column.primary_key,
                    column.auto_increment,
                    column.allow_null,
                    column.unique,
                );
            }
            catalog.upsert(table_name.clone(), list)?;
        }
        Ok(catalog)
    }
}
