//! SQL runner (C4): thin transaction and exec helpers over the embedded
//! engine. Prepared statements with parameter binding are used directly
//! by the engine (C8) for bulk inserts; this module covers DDL, pragmas,
//! and one-shot statements only.

use rusqlite::Connection;

use crate::error::CepResult;

/// Execute `BEGIN` against `conn`.
///
/// # Errors
/// Returns [`crate::error::CepError::SqlError`] on failure.
pub fn begin(conn: &Connection) -> CepResult<()> {
    conn.execute("BEGIN", [])?;
    Ok(())
}

/// Execute `COMMIT` against `conn`.
///
/// # Errors
/// Returns [`crate::error::CepError::SqlError`] on failure.
pub fn commit(conn: &Connection) -> CepResult<()> {
    conn.execute("COMMIT", [])?;
    Ok(())
}

/// Execute `ROLLBACK` against `conn`. Used to unwind a transaction whose
/// commit cannot be reached after a propagating error.
///
/// # Errors
/// Returns [`crate::error::CepError::SqlError`] on failure.
pub fn rollback(conn: &Connection) -> CepResult<()> {
    conn.execute("ROLLBACK", [])?;
    Ok(())
}

/// Prepare, step to completion, and finalize a DDL/PRAGMA/one-shot
/// statement, retrying indefinitely on `SQLITE_BUSY`.
///
/// Never used for the parameterised bulk inserts on the hot path; those
/// go through statements prepared directly by the engine so each row can
/// be bound and stepped without re-preparing.
///
/// # Errors
/// Returns [`crate::error::CepError::SqlError`] for any non-BUSY failure
/// reported by prepare, step, or finalize.
pub fn exec_update(conn: &Connection, sql: &str) -> CepResult<()> {
    loop {
        match conn.execute(sql, []) {
            Ok(_) => return Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::DatabaseBusy =>
            {
                tracing::warn!(sql, "database busy, retrying exec_update");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
