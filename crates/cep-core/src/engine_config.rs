//! Engine configurator (C5): applies the fixed pragma sequence to a
//! freshly opened database and exposes `VACUUM`.

use rusqlite::Connection;

use crate::error::CepResult;
use crate::sql_runner;

/// Apply, in order: `encoding=UTF-8`, `auto_vacuum`, `journal_mode=WAL`,
/// `synchronous`.
///
/// `auto_vacuum` is enabled (`1`) when `vacuum_record == 0` (engine
/// auto-vacuum selected) and disabled (`0`) otherwise, so a positive
/// `vacuum_record` always means manual vacuuming via [`vacuum`].
/// `synchronous` is `NORMAL` when `synchronous` is true, `OFF` otherwise.
///
/// # Errors
/// Returns [`crate::error::CepError::SqlError`] if any pragma is rejected.
pub fn configure(conn: &Connection, vacuum_record: u32, synchronous: bool) -> CepResult<()> {
    sql_runner::exec_update(conn, "PRAGMA encoding = 'UTF-8'")?;

    let auto_vacuum = u8::from(vacuum_record == 0);
    sql_runner::exec_update(conn, &format!("PRAGMA auto_vacuum = {auto_vacuum}"))?;

    sql_runner::exec_update(conn, "PRAGMA journal_mode = WAL")?;

    let mode = if synchronous { "NORMAL" } else { "OFF" };
    sql_runner::exec_update(conn, &format!("PRAGMA synchronous = {mode}"))?;

    Ok(())
}

/// Run `VACUUM` against `conn`.
///
/// # Errors
/// Returns [`crate::error::CepError::SqlError`] on failure.
pub fn vacuum(conn: &Connection) -> CepResult<()> {
    sql_runner::exec_update(conn, "VACUUM")
}
