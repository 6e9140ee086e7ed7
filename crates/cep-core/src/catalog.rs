//! Table catalog (C3): maps table names to [`ColumnList`]s and generates
//! `CREATE TABLE` DDL from them.

use std::collections::BTreeMap;

use rusqlite::Connection;

use crate::column::ColumnList;
use crate::error::{CepError, CepResult};

/// Registry of table schemas, keyed by table name.
///
/// Table names are unique; an empty column list is rejected on
/// [`Catalog::upsert`] because a table with no columns cannot be created.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: BTreeMap<String, ColumnList>,
}

impl Catalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a table's schema.
    ///
    /// # Errors
    /// Returns [`CepError::BadInput`] if `columns` is empty.
    pub fn upsert(&mut self, table_name: impl Into<String>, columns: ColumnList) -> CepResult<()> {
        if columns.is_empty() {
            return Err(CepError::bad_input("table schema must have at least one column"));
        }
        self.tables.insert(table_name.into(), columns);
        Ok(())
    }

    /// Look up a table's column list.
    #[must_use]
    pub fn lookup(&self, table_name: &str) -> Option<&ColumnList> {
        self.tables.get(table_name)
    }

    /// Iterate registered table names in sorted order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Issue one `CREATE TABLE IF NOT EXISTS` per registered table against
    /// `conn`.
    ///
    /// # Errors
    /// Returns [`CepError::SqlError`] if the embedded engine rejects a DDL
    /// statement.
    pub fn create_all(&self, conn: &Connection) -> CepResult<()> {
        for (table_name, columns) in &self.tables {
            let ddl = self.create_table_sql(table_name, columns);
            conn.execute(&ddl, [])?;
        }
        Ok(())
    }

    fn create_table_sql(&self, table_name: &str, columns: &ColumnList) -> String {
        let fragments: Vec<String> = columns.iter().map(|c| c.to_ddl_fragment()).collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {table_name} ({})",
            fragments.join(", ")
        )
    }

    /// A read-only helper used by tests to inspect a table's live schema
    /// via `PRAGMA table_info`.
    #[must_use]
    pub fn get_table_info_sql(table_name: &str) -> String {
        format!("PRAGMA table_info({table_name})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnType;

    fn daily_columns() -> ColumnList {
        let mut columns = ColumnList::new();
        columns.append("date", ColumnType::Datetime, false, false, false, false);
        columns.append("name", ColumnType::Text, false, false, false, false);
        columns.append("value", ColumnType::Real, false, false, false, false);
        columns
    }

    #[test]
    fn upsert_rejects_empty_column_list() {
        let mut catalog = Catalog::new();
        let err = catalog.upsert("daily", ColumnList::new()).unwrap_err();
        assert!(matches!(err, CepError::BadInput(_)));
    }

    #[test]
    fn create_all_issues_ddl_per_table() {
        let mut catalog = Catalog::new();
        catalog.upsert("daily", daily_columns()).unwrap();

        let conn = Connection::open_in_memory().unwrap();
        catalog.create_all(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='daily'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn table_info_sql_is_read_only_pragma() {
        assert_eq!(Catalog::get_table_info_sql("daily"), "PRAGMA table_info(daily)");
    }
}
