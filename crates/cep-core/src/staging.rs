//! Staging buffer (C6): per-table FIFO queues of raw CSV row strings,
//! holding rows that are either pending insert into the memory DB (`new`)
//! or already inserted and waiting for possible spill (`old`).

use std::collections::{BTreeMap, VecDeque};

/// One table's staging state.
///
/// `new` rows have not yet reached the memory DB; `old` rows have, and
/// remain here only so they can be spilled to the file DB once the
/// in-memory cap is exceeded. Both queues are strict FIFO; this order is
/// what both the in-memory insert and the file-DB spill rely on.
#[derive(Debug, Clone, Default)]
pub struct StagingRecord {
    /// The header captured on first use, for diagnostics only; row
    /// values are bound positionally against the catalog, not by name.
    pub column_name_csv: String,
    /// Rows staged but not yet stepped into the memory DB.
    pub new: VecDeque<String>,
    /// Rows already in the memory DB, candidates for spill.
    pub old: VecDeque<String>,
}

impl StagingRecord {
    fn new_empty() -> Self {
        Self::default()
    }
}

/// Staging records for every table that has seen at least one insert,
/// keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct StagingBuffer {
    records: BTreeMap<String, StagingRecord>,
}

impl StagingBuffer {
    /// An empty staging buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the staging record for `table_name`, tagging it with
    /// `header` the first time it is created.
    pub fn record_mut(&mut self, table_name: &str, header: &str) -> &mut StagingRecord {
        let record = self
            .records
            .entry(table_name.to_string())
            .or_insert_with(StagingRecord::new_empty);
        if record.column_name_csv.is_empty() {
            record.column_name_csv = header.to_string();
        }
        record
    }

    /// Iterate all staging records, in table-name order, for the
    /// "for every staging record" steps of the pipeline (flush and
    /// spill both iterate every table, not just the one targeted by the
    /// current `insert_csv` call).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut StagingRecord)> {
        self.records.iter_mut()
    }

    /// Borrow a single table's staging record, if it has ever staged a
    /// row.
    #[must_use]
    pub fn get(&self, table_name: &str) -> Option<&StagingRecord> {
        self.records.get(table_name)
    }

    /// Names of every table that has a staging record, in sorted order.
    /// Lets callers enumerate "every staging record" without taking a
    /// mutable borrow just to read the keys.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_mut_creates_and_tags_header_once() {
        let mut buffer = StagingBuffer::new();
        buffer.record_mut("daily", "date,name,value");
        buffer.record_mut("daily", "ignored,second,header");

        let record = buffer.get("daily").unwrap();
        assert_eq!(record.column_name_csv, "date,name,value");
    }

    #[test]
    fn new_and_old_preserve_fifo_order() {
        let mut buffer = StagingBuffer::new();
        let record = buffer.record_mut("daily", "date");
        record.new.push_back("1".to_string());
        record.new.push_back("2".to_string());
        record.new.push_back("3".to_string());

        let moved: Vec<String> = record.new.drain(..).collect();
        record.old.extend(moved);

        assert_eq!(
            record.old.iter().cloned().collect::<Vec<_>>(),
            vec!["1".to_string(), "2".to_string(), "3".to_string()]
        );
    }
}
