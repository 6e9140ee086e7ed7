//! CSV codec (C7): parses one header line plus N data rows into staged
//! row strings, and formats `SELECT` results back into CSV.
//!
//! There is no quoting layer: fields are split on `,` and rows are split
//! on `\r\n` or `\n`. Values must not contain either.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rusqlite::types::ValueRef;

use crate::column::ColumnType;

/// A CSV payload split into its header and raw data-row lines.
///
/// Rows are kept as unparsed strings; positional splitting against a
/// table's column list happens later, once the target table (and its
/// expected field count) is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCsv<'a> {
    /// The raw header line, comma-separated column names.
    pub header: &'a str,
    /// Raw data-row lines, in file order.
    pub rows: Vec<&'a str>,
}

/// Split `csv` into a header line and its data rows.
///
/// Accepts `\r\n` or `\n` line terminators; a trailing blank line is
/// ignored. A header-only payload (or an empty string) yields an empty
/// `rows` vector rather than an error; that case is a documented no-op
/// at the call site.
#[must_use]
pub fn parse(csv: &str) -> ParsedCsv<'_> {
    let mut lines = split_lines(csv).into_iter();
    let header = lines.next().unwrap_or("");
    let rows = lines.filter(|line| !line.is_empty()).collect();
    ParsedCsv { header, rows }
}

fn split_lines(csv: &str) -> Vec<&str> {
    csv.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line)).collect()
}

/// Split a single CSV row (or header) into its comma-separated fields.
#[must_use]
pub fn split_fields(line: &str) -> Vec<&str> {
    if line.is_empty() {
        return Vec::new();
    }
    line.split(',').collect()
}

/// Format the comma-separated header of a `SELECT` result from the
/// underlying tables' column *origin* names (never the query's aliases).
#[must_use]
pub fn format_header(origin_names: &[String]) -> String {
    origin_names.join(",")
}

/// Format a single result-set value according to its declared column
/// type, per §4.5:
/// - `INTEGER` → decimal integer
/// - `REAL`/`FLOAT`/`DOUBLE` → decimal with full `double` precision
/// - `TEXT` → raw UTF-8 bytes
/// - `BLOB` → Base64, no line breaks
/// - `NULL` → the literal string `NULL`
///
/// A SQL `NULL` value always formats as `NULL` regardless of the
/// column's declared type.
#[must_use]
pub fn format_value(column_type: ColumnType, value: ValueRef<'_>) -> String {
    if matches!(value, ValueRef::Null) {
        return "NULL".to_string();
    }
    match column_type {
        ColumnType::Integer | ColumnType::Bool | ColumnType::Datetime => match value {
            ValueRef::Integer(i) => i.to_string(),
            ValueRef::Real(r) => format!("{:.0}", r),
            ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
            _ => "NULL".to_string(),
        },
        ColumnType::Real | ColumnType::Numeric => match value {
            ValueRef::Real(r) => format!("{r:.6}"),
            ValueRef::Integer(i) => format!("{i}.000000"),
            ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
            _ => "NULL".to_string(),
        },
        ColumnType::Text => match value {
            ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
            ValueRef::Integer(i) => i.to_string(),
            ValueRef::Real(r) => format!("{r}"),
            ValueRef::Blob(b) => BASE64.encode(b),
            ValueRef::Null => "NULL".to_string(),
        },
        ColumnType::Blob => match value {
            ValueRef::Blob(b) => BASE64.encode(b),
            ValueRef::Text(t) => BASE64.encode(t),
            _ => "NULL".to_string(),
        },
        ColumnType::Null => "NULL".to_string(),
    }
}

/// Assemble a formatted header and rows into the final CSV string, or
/// `None` if zero data rows were produced.
#[must_use]
pub fn join_csv(header: &str, rows: &[String]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(header.len() + rows.iter().map(String::len).sum::<usize>() + rows.len() * 2 + 2);
    out.push_str(header);
    out.push_str("\r\n");
    for row in rows {
        out.push_str(row);
        out.push_str("\r\n");
    }
    Some(out)
}
