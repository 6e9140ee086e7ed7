//! Error types for the CEP pipeline.
//!
//! Mirrors the four error kinds the engine is specified to expose:
//! malformed input, embedded-engine failures, filesystem failures, and
//! genuinely unexpected internal state.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout `cep-core`.
pub type CepResult<T> = Result<T, CepError>;

/// Errors the CEP engine can return.
///
/// Construction helpers (`bad_input`, `internal`) exist so call sites read
/// as a short phrase rather than a struct literal; `#[from]` conversions
/// handle the embedded-engine and filesystem cases, which always carry a
/// source error.
#[derive(Debug, Error)]
pub enum CepError {
    /// Malformed CSV, an unknown table, a field-count mismatch, or a
    /// setter argument outside its documented domain.
    #[error("bad input: {0}")]
    BadInput(String),

    /// The embedded SQL engine reported a non-BUSY failure during
    /// prepare, step, finalize, a transaction boundary, or a pragma.
    #[error("sql error: {0}")]
    SqlError(#[from] rusqlite::Error),

    /// The config directory or the file database could not be created or
    /// opened.
    #[error("io error at {path}: {source}")]
    IoError {
        /// The path the operation was attempted against.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// State that should be unreachable under the documented invariants
    /// (e.g. a staging record missing after being placed).
    #[error("internal error: {0}")]
    Internal(String),
}

impl CepError {
    /// Build a [`CepError::BadInput`] from any displayable message.
    pub fn bad_input(msg: impl Into<String>) -> Self {
        Self::BadInput(msg.into())
    }

    /// Build a [`CepError::Internal`] from any displayable message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Build a [`CepError::IoError`], tagging it with the path that was
    /// being operated on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}
