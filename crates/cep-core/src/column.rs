//! Column descriptors (C1) and ordered, name-unique column lists (C2).

use std::fmt;

/// A closed set of SQL storage classes mirroring what the embedded engine
/// understands natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// `INTEGER`.
    Integer,
    /// `REAL` / `DOUBLE` / `FLOAT`.
    Real,
    /// `TEXT` / `VARCHAR` / `CHAR`.
    Text,
    /// `BLOB`.
    Blob,
    /// `NUMERIC`.
    Numeric,
    /// `BOOL`, stored as an integer 0/1.
    Bool,
    /// `DATETIME`, stored as integer milliseconds.
    Datetime,
    /// `NULL`.
    Null,
}

impl ColumnType {
    /// The SQL type keyword emitted in `CREATE TABLE` DDL.
    #[must_use]
    pub fn sql_keyword(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
            Self::Numeric => "NUMERIC",
            Self::Bool => "BOOL",
            Self::Datetime => "DATETIME",
            Self::Null => "NULL",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_keyword())
    }
}

/// One column's name, SQL type, and constraint flags.
///
/// Immutable once published into a [`ColumnList`] (every field is set at
/// construction and never mutated afterwards).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    primary_key: bool,
    auto_increment: bool,
    allow_null: bool,
    unique: bool,
}

impl Column {
    /// Build a column descriptor. `name` must be non-empty; callers
    /// typically go through [`ColumnList::append`] rather than
    /// constructing a `Column` directly.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        column_type: ColumnType,
        primary_key: bool,
        auto_increment: bool,
        allow_null: bool,
        unique: bool,
    ) -> Self {
        Self {
            name: name.into(),
            column_type,
            primary_key,
            auto_increment,
            allow_null,
            unique,
        }
    }

    /// The column's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column's declared type.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Whether this column is the table's primary key.
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Whether this column auto-increments.
    #[must_use]
    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    /// Whether `NULL` is a legal value for this column.
    #[must_use]
    pub fn allows_null(&self) -> bool {
        self.allow_null
    }

    /// Whether this column carries a `UNIQUE` constraint.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Render the `name TYPE [PRIMARY KEY] [AUTOINCREMENT] [NOT NULL] [UNIQUE]`
    /// fragment used when composing `CREATE TABLE` DDL.
    #[must_use]
    pub fn to_ddl_fragment(&self) -> String {
        let mut fragment = format!("{} {}", self.name, self.column_type.sql_keyword());
        if self.primary_key {
            fragment.push_str(" PRIMARY KEY");
        }
        if self.auto_increment {
            fragment.push_str(" AUTOINCREMENT");
        }
        if !self.allow_null {
            fragment.push_str(" NOT NULL");
        }
        if self.unique {
            fragment.push_str(" UNIQUE");
        }
        fragment
    }
}

/// Ordered sequence of [`Column`] descriptors describing one table.
///
/// Column names are unique (case-sensitive); order defines the positional
/// layout used to bind CSV fields. [`ColumnList::append`] silently ignores
/// a duplicate name rather than erroring or replacing, matching the
/// source's "publish once" semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnList {
    columns: Vec<Column>,
}

impl ColumnList {
    /// An empty column list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, returning the column that now occupies that name:
    /// either the one just appended, or the pre-existing one if `name`
    /// was already registered.
    pub fn append(
        &mut self,
        name: impl Into<String>,
        column_type: ColumnType,
        primary_key: bool,
        auto_increment: bool,
        allow_null: bool,
        unique: bool,
    ) -> &Column {
        let name = name.into();
        if let Some(index) = self.columns.iter().position(|c| c.name == name) {
            return &self.columns[index];
        }
        self.columns.push(Column::new(
            name,
            column_type,
            primary_key,
            auto_increment,
            allow_null,
            unique,
        ));
        let last = self.columns.len() - 1;
        &self.columns[last]
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the list has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column by name.
    #[must_use]
    pub fn search(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Iterate columns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }
}

impl<'a> IntoIterator for &'a ColumnList {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
