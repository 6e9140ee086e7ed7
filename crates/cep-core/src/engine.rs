//! The CEP engine (C8): orchestrates the two databases and the staging
//! buffer, implementing insert → evict → spill → vacuum and ad-hoc
//! `SELECT`.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::types::Value as SqlValue;
use rusqlite::Connection;

use crate::catalog::Catalog;
use crate::column::{ColumnList, ColumnType};
use crate::csv_codec;
use crate::engine_config;
use crate::error::{CepError, CepResult};
use crate::sql_runner;
use crate::staging::StagingBuffer;

const CONFIG_SUBDIR: &str = ".m2m/cep";
const DEFAULT_MAX_RECORD: u32 = 50;

/// The orchestrator: owns the in-memory window, the optional file-backed
/// store, the catalog, and the staging buffer, and runs the pipeline
/// described in §4.6 of the specification.
#[derive(Debug)]
pub struct CepEngine {
    database_name: String,
    catalog: Catalog,
    memory_db: Connection,
    file_db: Option<Connection>,
    data_home: PathBuf,
    staging: StagingBuffer,
    max_record: u32,
    vacuum_record: u32,
    record_counter: u32,
    persistence: bool,
}

impl CepEngine {
    /// Create a new engine. Opens and configures the `:memory:` database
    /// and creates every table from `catalog` in it; the file database is
    /// not opened until the first row is evicted (lazy open).
    ///
    /// The file database's directory is resolved from the `HOME`
    /// environment variable, as specified.
    ///
    /// # Errors
    /// Returns [`CepError::IoError`] if `HOME` is unset, or
    /// [`CepError::SqlError`] if the memory database cannot be configured
    /// or its tables created.
    pub fn new(database_name: impl Into<String>, catalog: Catalog) -> CepResult<Self> {
        let home = home_dir()?;
        Self::with_data_home(database_name, catalog, home)
    }

    /// Like [`CepEngine::new`], but takes the data home directory
    /// explicitly instead of reading `HOME`. Exists so tests (and
    /// embedders who already know their data directory) don't need to
    /// mutate process-wide environment state.
    ///
    /// # Errors
    /// Same as [`CepEngine::new`].
    pub fn with_data_home(
        database_name: impl Into<String>,
        catalog: Catalog,
        data_home: PathBuf,
    ) -> CepResult<Self> {
        let database_name = normalize_database_name(&database_name.into());
        let memory_db = Connection::open_in_memory()?;
        engine_config::configure(&memory_db, 0, true)?;
        catalog.create_all(&memory_db)?;

        Ok(Self {
            database_name,
            catalog,
            memory_db,
            file_db: None,
            data_home,
            staging: StagingBuffer::new(),
            max_record: DEFAULT_MAX_RECORD,
            vacuum_record: 0,
            record_counter: 0,
            persistence: true,
        })
    }

    /// The (normalized, `.sqlite`-suffixed) database name.
    #[must_use]
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Current per-table in-memory row cap.
    #[must_use]
    pub fn max_record(&self) -> u32 {
        self.max_record
    }

    /// Current vacuum threshold (`0` means engine auto-vacuum).
    #[must_use]
    pub fn vacuum_record(&self) -> u32 {
        self.vacuum_record
    }

    /// Whether evicted rows are currently being spilled to the file DB.
    #[must_use]
    pub fn persistence(&self) -> bool {
        self.persistence
    }

    /// Rows inserted since the last vacuum.
    #[must_use]
    pub fn record_counter(&self) -> u32 {
        self.record_counter
    }

    /// Set the per-table in-memory row cap.
    ///
    /// # Errors
    /// Returns [`CepError::BadInput`] unless `1 <= n < 500`; the engine's
    /// state is unchanged on error.
    #[tracing::instrument(skip(self))]
    pub fn set_max_record(&mut self, n: u32) -> CepResult<()> {
        if !(1..500).contains(&n) {
            let err = CepError::bad_input(format!("max_record must satisfy 1 <= n < 500, got {n}"));
            tracing::warn!(error = %err, "set_max_record rejected");
            return Err(err);
        }
        self.max_record = n;
        Ok(())
    }

    /// Toggle persistence. Turning it off does not close an already-open
    /// file database, it only stops future spills; turning it back on
    /// allows a lazy open on the next spill.
    #[tracing::instrument(skip(self))]
    pub fn set_persistence(&mut self, persistence: bool) {
        self.persistence = persistence;
    }

    /// Set the vacuum threshold. `0` selects engine auto-vacuum; a
    /// positive value triggers a manual `VACUUM` once `record_counter`
    /// exceeds it. Does not retroactively reconfigure the `auto_vacuum`
    /// pragma of already-open databases.
    #[tracing::instrument(skip(self))]
    pub fn set_vacuum_record(&mut self, n: u32) {
        self.vacuum_record = n;
    }

    /// Run the full insert pipeline for one CSV payload against `table`:
    /// stage, flush every table's staged rows into the memory DB, evict
    /// `table`'s excess, spill every table's excess, and vacuum if due.
    ///
    /// Returns the number of rows that were stepped into the memory DB
    /// during this call (which may be less than the number of rows
    /// parsed, if individual rows failed to bind or step; those are
    /// logged and dropped rather than aborting the batch).
    ///
    /// # Errors
    /// Returns [`CepError::BadInput`] if `csv` is malformed or `table` is
    /// unknown (nothing is mutated in that case). Returns
    /// [`CepError::SqlError`] if a transaction boundary fails, or
    /// [`CepError::IoError`]/[`CepError::SqlError`] if persistence is on
    /// and the file database cannot be opened for spilling.
    #[tracing::instrument(skip(self, csv))]
    pub fn insert_csv(&mut self, table: &str, csv: &str) -> CepResult<u32> {
        self.stage(table, csv)?;
        let inserted = self.flush_to_memory()?;
        self.record_counter += inserted;
        self.evict(table)?;
        self.spill()?;
        self.maybe_vacuum()?;
        Ok(inserted)
    }

    /// Run an ad-hoc `SELECT` against the memory DB and format the
    /// result as CSV, or `None` if it produced zero rows.
    ///
    /// # Errors
    /// Returns [`CepError::SqlError`] if `sql` fails to prepare, bind, or
    /// step.
    #[tracing::instrument(skip(self, sql))]
    pub fn select(&self, sql: &str) -> CepResult<Option<String>> {
        let mut stmt = self.memory_db.prepare(sql).map_err(|e| {
            tracing::error!(error = %e, "select failed to prepare statement");
            e
        })?;
        let column_count = stmt.column_count();

        let mut origin_names = Vec::with_capacity(column_count);
        let mut column_types = Vec::with_capacity(column_count);
        for i in 0..column_count {
            let origin = stmt
                .column_origin_name(i)
                .map(str::to_string)
                .unwrap_or_else(|_| stmt.column_name(i).unwrap_or_default().to_string());
            let declared_type = stmt
                .column_table_name(i)
                .ok()
                .and_then(|table| self.catalog.lookup(table))
                .and_then(|columns| columns.search(&origin))
                .map(crate::column::Column::column_type)
                .unwrap_or(ColumnType::Text);
            origin_names.push(origin);
            column_types.push(declared_type);
        }
        let header = csv_codec::format_header(&origin_names);

        let mut formatted_rows = Vec::new();
        let mut rows = stmt.query([]).map_err(|e| {
            tracing::error!(error = %e, "select failed to bind parameters");
            e
        })?;
        while let Some(row) = rows.next().map_err(|e| {
            tracing::error!(error = %e, "select failed stepping result rows");
            e
        })? {
            let mut fields = Vec::with_capacity(column_count);
            for i in 0..column_count {
                let value = row.get_ref(i)?;
                fields.push(csv_codec::format_value(column_types[i], value));
            }
            formatted_rows.push(fields.join(","));
        }

        Ok(csv_codec::join_csv(&header, &formatted_rows))
    }

    /// Final flush and shutdown: spill every remaining staged row (not
    /// just the excess over `max_record`) into the file DB, then close
    /// both databases. Consumes the engine so it cannot be used
    /// afterwards.
    ///
    /// # Errors
    /// Returns [`CepError::SqlError`]/[`CepError::IoError`] if the final
    /// flush's transaction or file-DB open fails.
    pub fn shutdown(mut self) -> CepResult<()> {
        self.final_flush()
    }

    // --- pipeline steps -------------------------------------------------

    /// Step 1: parse and stage. Validates the whole payload before
    /// touching staging, so a malformed row leaves every table's queues
    /// untouched.
    fn stage(&mut self, table: &str, csv: &str) -> CepResult<u32> {
        let columns = self
            .catalog
            .lookup(table)
            .ok_or_else(|| {
                let err = CepError::bad_input(format!("unknown table '{table}'"));
                tracing::warn!(error = %err, "stage rejected");
                err
            })?
            .clone();

        let parsed = csv_codec::parse(csv);
        if parsed.rows.is_empty() {
            return Ok(0);
        }

        for row in &parsed.rows {
            let fields = csv_codec::split_fields(row);
            if fields.len() != columns.len() {
                let err = CepError::bad_input(format!(
                    "table '{table}' expects {} fields, row '{row}' has {}",
                    columns.len(),
                    fields.len()
                ));
                tracing::warn!(error = %err, "stage rejected");
                return Err(err);
            }
        }

        let staged = u32::try_from(parsed.rows.len()).unwrap_or(u32::MAX);
        let record = self.staging.record_mut(table, parsed.header);
        for row in parsed.rows {
            record.new.push_back(row.to_string());
        }
        Ok(staged)
    }

    /// Step 2: flush every table's `new` queue into the memory DB under
    /// one transaction, moving successfully-stepped rows to `old`.
    fn flush_to_memory(&mut self) -> CepResult<u32> {
        sql_runner::begin(&self.memory_db).map_err(|e| {
            tracing::error!(error = %e, "flush_to_memory failed to begin transaction");
            e
        })?;

        let table_names: Vec<String> = self.staging.table_names().map(str::to_string).collect();
        let mut total = 0u32;
        for table_name in table_names {
            let Some(columns) = self.catalog.lookup(&table_name).cloned() else {
                continue;
            };
            let insert_sql = build_insert_sql(&table_name, &columns);
            let mut stmt = match self.memory_db.prepare(&insert_sql) {
                Ok(stmt) => stmt,
                Err(e) => {
                    let _ = sql_runner::rollback(&self.memory_db);
                    return Err(e.into());
                }
            };

            let record = self.staging.record_mut(&table_name, "");
            let mut just_stepped = Vec::new();
            while let Some(row) = record.new.pop_front() {
                let fields = csv_codec::split_fields(&row);
                match bind_and_step(&mut stmt, &columns, &fields) {
                    Ok(()) => {
                        total += 1;
                        just_stepped.push(row);
                    }
                    Err(e) => {
                        tracing::warn!(table = %table_name, error = %e, "dropping row that failed to step into memory db");
                    }
                }
            }
            record.old.extend(just_stepped);
        }

        sql_runner::commit(&self.memory_db).map_err(|e| {
            tracing::error!(error = %e, "flush_to_memory failed to commit transaction");
            e
        })?;
        Ok(total)
    }

    /// Step 4: evict `table`'s excess rows from the memory DB, oldest
    /// `rowid` first. `excess` is computed from the staging `old` queue
    /// length, matching the source's behavior (see SPEC_FULL.md §9 for
    /// the divergence risk this carries if staging and memory-DB counts
    /// ever disagree).
    fn evict(&mut self, table: &str) -> CepResult<()> {
        let old_len = self.staging.get(table).map_or(0, |r| r.old.len());
        let excess = old_len.saturating_sub(self.max_record as usize);
        if excess == 0 {
            return Ok(());
        }
        let sql = format!(
            "DELETE FROM {table} WHERE rowid IN (SELECT rowid FROM {table} ORDER BY rowid LIMIT {excess})"
        );
        sql_runner::exec_update(&self.memory_db, &sql).map_err(|e| {
            tracing::error!(table, error = %e, "evict failed to delete excess rows");
            e
        })
    }

    /// Step 5: spill every table's excess `old` rows to the file DB (or
    /// drop them if persistence is off).
    #[tracing::instrument(skip(self))]
    fn spill(&mut self) -> CepResult<()> {
        if !self.persistence {
            self.drop_excess(self.max_record as usize);
            return Ok(());
        }
        self.ensure_file_db()?;
        self.spill_to_file_db(self.max_record as usize)
    }

    /// Step 6: vacuum both databases if the counter is over threshold,
    /// then reset it.
    #[tracing::instrument(skip(self))]
    fn maybe_vacuum(&mut self) -> CepResult<()> {
        if self.vacuum_record == 0 || self.record_counter <= self.vacuum_record {
            return Ok(());
        }
        engine_config::vacuum(&self.memory_db).map_err(|e| {
            tracing::error!(error = %e, "maybe_vacuum failed to vacuum memory db");
            e
        })?;
        if self.persistence {
            if let Some(file_db) = &self.file_db {
                engine_config::vacuum(file_db).map_err(|e| {
                    tracing::error!(error = %e, "maybe_vacuum failed to vacuum file db");
                    e
                })?;
            }
        }
        self.record_counter = 0;
        Ok(())
    }

    /// Drop every table's `old` rows past `keep`, without persisting
    /// them. Used when persistence is off.
    fn drop_excess(&mut self, keep: usize) {
        let table_names: Vec<String> = self.staging.table_names().map(str::to_string).collect();
        for table_name in table_names {
            let record = self.staging.record_mut(&table_name, "");
            while record.old.len() > keep {
                record.old.pop_front();
            }
        }
    }

    /// Spill every table's `old` rows past `keep` into the already-open
    /// file DB, under one transaction.
    fn spill_to_file_db(&mut self, keep: usize) -> CepResult<()> {
        let file_db = self
            .file_db
            .as_ref()
            .ok_or_else(|| CepError::internal("file db not open after ensure_file_db"))?;

        sql_runner::begin(file_db).map_err(|e| {
            tracing::error!(error = %e, "spill_to_file_db failed to begin transaction");
            e
        })?;
        let table_names: Vec<String> = self.staging.table_names().map(str::to_string).collect();
        for table_name in table_names {
            let Some(columns) = self.catalog.lookup(&table_name).cloned() else {
                continue;
            };
            let insert_sql = build_insert_sql(&table_name, &columns);
            let mut stmt = match file_db.prepare(&insert_sql) {
                Ok(stmt) => stmt,
                Err(e) => {
                    let _ = sql_runner::rollback(file_db);
                    return Err(e.into());
                }
            };

            let record = self.staging.record_mut(&table_name, "");
            while record.old.len() > keep {
                let Some(row) = record.old.pop_front() else {
                    break;
                };
                let fields = csv_codec::split_fields(&row);
                if let Err(e) = bind_and_step(&mut stmt, &columns, &fields) {
                    tracing::warn!(table = %table_name, error = %e, "dropping row that failed to spill to file db");
                }
            }
        }
        sql_runner::commit(file_db).map_err(|e| {
            tracing::error!(error = %e, "spill_to_file_db failed to commit transaction");
            e
        })
    }

    /// Final flush used by [`CepEngine::shutdown`]: spills every
    /// remaining `old` row, not just the excess over `max_record`.
    fn final_flush(&mut self) -> CepResult<()> {
        if !self.persistence {
            return Ok(());
        }
        self.ensure_file_db()?;
        self.spill_to_file_db(0)
    }

    /// Open the file DB if it isn't already, creating the config
    /// directory (mode `0755`) and every catalog table in it if needed.
    #[tracing::instrument(skip(self))]
    fn ensure_file_db(&mut self) -> CepResult<()> {
        if self.file_db.is_some() {
            return Ok(());
        }
        let dir = self.config_dir();
        create_config_dir(&dir).map_err(|e| {
            tracing::error!(error = %e, "ensure_file_db failed to create config directory");
            e
        })?;

        let path = dir.join(&self.database_name);
        let conn = Connection::open(&path).map_err(|e| {
            let err = CepError::from(e);
            tracing::error!(error = %err, "ensure_file_db failed to open file database");
            err
        })?;
        engine_config::configure(&conn, self.vacuum_record, true).map_err(|e| {
            tracing::error!(error = %e, "ensure_file_db failed to configure file database");
            e
        })?;
        self.catalog.create_all(&conn).map_err(|e| {
            tracing::error!(error = %e, "ensure_file_db failed to create tables");
            e
        })?;
        self.file_db = Some(conn);
        Ok(())
    }

    fn config_dir(&self) -> PathBuf {
        self.data_home.join(CONFIG_SUBDIR)
    }
}

fn normalize_database_name(name: &str) -> String {
    if name.ends_with(".sqlite") {
        name.to_string()
    } else {
        format!("{name}.sqlite")
    }
}

fn home_dir() -> CepResult<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .ok_or_else(|| {
            CepError::io(
                "$HOME",
                std::io::Error::new(std::io::ErrorKind::NotFound, "HOME is not set"),
            )
        })
}

/// Create `dir` and any missing ancestors, applying mode `0755` to every
/// component actually created (not just the leaf), mirroring the
/// original's recursive `M2MDirectory_mkdirs(path, "0755")`. A component
/// that already existed is left with whatever permissions it already
/// had.
fn create_config_dir(dir: &Path) -> CepResult<()> {
    let mut missing = Vec::new();
    let mut cursor = dir;
    loop {
        if cursor.exists() {
            break;
        }
        missing.push(cursor);
        match cursor.parent() {
            Some(parent) => cursor = parent,
            None => break,
        }
    }

    for component in missing.into_iter().rev() {
        match fs::create_dir(component) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(CepError::io(component, e)),
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o755);
            fs::set_permissions(component, perms).map_err(|e| CepError::io(component, e))?;
        }
    }
    Ok(())
}

fn build_insert_sql(table: &str, columns: &ColumnList) -> String {
    let names: Vec<&str> = columns.iter().map(crate::column::Column::name).collect();
    let placeholders = vec!["?"; columns.len()].join(",");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        names.join(",")
    )
}

/// Convert one CSV row's positional fields into the parameters for one
/// parameterised `INSERT`, then bind and step it. Any failure (a field
/// that doesn't parse as its column's type, or a step rejected by the
/// embedded engine, e.g. a `UNIQUE` violation) is returned to the
/// caller, which logs it and drops the row rather than aborting the
/// transaction.
fn bind_and_step(
    stmt: &mut rusqlite::Statement<'_>,
    columns: &ColumnList,
    fields: &[&str],
) -> CepResult<()> {
    let params = build_params(columns, fields)?;
    stmt.execute(rusqlite::params_from_iter(params.iter()))?;
    Ok(())
}

fn build_params(columns: &ColumnList, fields: &[&str]) -> CepResult<Vec<SqlValue>> {
    let mut params = Vec::with_capacity(columns.len());
    for (column, field) in columns.iter().zip(fields) {
        if field.is_empty() && column.allows_null() {
            params.push(SqlValue::Null);
            continue;
        }
        let value = match column.column_type() {
            ColumnType::Integer | ColumnType::Datetime => {
                let parsed: i64 = field.parse().map_err(|_| {
                    CepError::bad_input(format!(
                        "column '{}' expects an integer, got '{field}'",
                        column.name()
                    ))
                })?;
                SqlValue::Integer(parsed)
            }
            ColumnType::Bool => {
                if field.eq_ignore_ascii_case("true") {
                    SqlValue::Integer(1)
                } else if field.eq_ignore_ascii_case("false") {
                    SqlValue::Integer(0)
                } else {
                    return Err(CepError::bad_input(format!(
                        "column '{}' expects true/false, got '{field}'",
                        column.name()
                    )));
                }
            }
            ColumnType::Real | ColumnType::Numeric => {
                let parsed: f64 = field.parse().map_err(|_| {
                    CepError::bad_input(format!(
                        "column '{}' expects a number, got '{field}'",
                        column.name()
                    ))
                })?;
                SqlValue::Real(parsed)
            }
            ColumnType::Text => SqlValue::Text((*field).to_string()),
            ColumnType::Blob => SqlValue::Blob(field.as_bytes().to_vec()),
            ColumnType::Null => SqlValue::Null,
        };
        params.push(value);
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnType;

    fn daily_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        let mut columns = ColumnList::new();
        columns.append("date", ColumnType::Datetime, false, false, false, false);
        columns.append("name", ColumnType::Text, false, false, false, false);
        columns.append("value", ColumnType::Real, false, false, false, false);
        catalog.upsert("daily", columns).unwrap();
        catalog
    }

    fn engine_with_home(dir: &Path) -> CepEngine {
        CepEngine::with_data_home("scenario", daily_catalog(), dir.to_path_buf()).unwrap()
    }

    #[test]
    fn new_normalizes_database_name_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with_home(dir.path());
        assert_eq!(engine.database_name(), "scenario.sqlite");
    }

    #[test]
    fn insert_then_select_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine_with_home(dir.path());
        let inserted = engine
            .insert_csv("daily", "date,name,value\r\n1,食べ物,1.0\r\n2,x,2.5\r\n")
            .unwrap();
        assert_eq!(inserted, 2);

        let csv = engine
            .select("SELECT date,name,value FROM daily ORDER BY date")
            .unwrap()
            .unwrap();
        assert_eq!(csv, "date,name,value\r\n1,食べ物,1.000000\r\n2,x,2.500000\r\n");
    }

    #[test]
    fn select_returns_none_for_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_with_home(dir.path());
        let result = engine.select("SELECT date FROM daily").unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn bad_csv_field_count_is_rejected_without_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine_with_home(dir.path());
        let err = engine.insert_csv("daily", "date,name,value\r\n1,x\r\n").unwrap_err();
        assert!(matches!(err, CepError::BadInput(_)));
        assert_eq!(engine.select("SELECT * FROM daily").unwrap(), None);
    }

    #[test]
    fn unknown_table_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine_with_home(dir.path());
        let err = engine.insert_csv("missing", "a,b\r\n1,2\r\n").unwrap_err();
        assert!(matches!(err, CepError::BadInput(_)));
    }

    #[test]
    fn set_max_record_rejects_out_of_domain_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine_with_home(dir.path());
        assert!(engine.set_max_record(0).is_err());
        assert!(engine.set_max_record(500).is_err());
        assert!(engine.set_max_record(1).is_ok());
        assert!(engine.set_max_record(499).is_ok());
        assert_eq!(engine.max_record(), 499);
    }

    #[test]
    fn window_eviction_caps_memory_table_without_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine_with_home(dir.path());
        engine.set_max_record(50).unwrap();
        engine.set_persistence(false);

        for date in 0..1010 {
            let csv = format!("date,name,value\r\n{date},d{date},{date}.0\r\n");
            engine.insert_csv("daily", &csv).unwrap();
        }

        let csv = engine.select("SELECT count(*) AS n FROM daily").unwrap().unwrap();
        assert!(csv.contains("50"));
        assert!(!dir.path().join(".m2m/cep/scenario.sqlite").exists());
    }

    #[test]
    fn spill_preserves_fifo_order_into_file_db() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine_with_home(dir.path());
        engine.set_max_record(50).unwrap();

        for date in 0..1010 {
            let csv = format!("date,name,value\r\n{date},d{date},{date}.0\r\n");
            engine.insert_csv("daily", &csv).unwrap();
        }

        engine.shutdown().unwrap();

        let file_path = dir.path().join(".m2m/cep/scenario.sqlite");
        assert!(file_path.exists());
        let conn = Connection::open(file_path).unwrap();
        let count: i64 = conn.query_row("SELECT count(*) FROM daily", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 1010);
        let min_date: i64 = conn
            .query_row("SELECT min(date) FROM daily", [], |r| r.get(0))
            .unwrap();
        let max_date: i64 = conn
            .query_row("SELECT max(date) FROM daily", [], |r| r.get(0))
            .unwrap();
        assert_eq!(min_date, 0);
        assert_eq!(max_date, 1009);
    }

    #[test]
    fn vacuum_triggers_once_and_resets_counter() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine_with_home(dir.path());
        engine.set_max_record(50).unwrap();
        engine.set_vacuum_record(1000);

        for date in 0..1010 {
            let csv = format!("date,name,value\r\n{date},d{date},{date}.0\r\n");
            engine.insert_csv("daily", &csv).unwrap();
        }

        assert!(engine.record_counter() <= 10);
    }
}
