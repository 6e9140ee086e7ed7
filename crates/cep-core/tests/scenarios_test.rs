//! End-to-end scenarios over a realistic `daily(date, name, value)`
//! schema: window eviction, spill ordering, vacuum triggering, select
//! formatting, and bad-input rejection.

use cep_core::{Catalog, CepEngine, ColumnList, ColumnType};

fn daily_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    let mut columns = ColumnList::new();
    columns.append("date", ColumnType::Datetime, false, false, false, false);
    columns.append("name", ColumnType::Text, false, false, false, false);
    columns.append("value", ColumnType::Real, false, false, false, false);
    catalog.upsert("daily", columns).unwrap();
    catalog
}

fn engine_in(dir: &std::path::Path) -> CepEngine {
    CepEngine::with_data_home("scenario", daily_catalog(), dir.to_path_buf()).unwrap()
}

#[test]
fn window_eviction_without_persistence_caps_at_fifty_and_writes_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_in(dir.path());
    engine.set_max_record(50).unwrap();
    engine.set_persistence(false);

    for date in 0..1010 {
        let csv = format!("date,name,value\r\n{date},d{date},1.0\r\n");
        engine.insert_csv("daily", &csv).unwrap();
        let csv = engine.select("SELECT count(*) AS n FROM daily").unwrap().unwrap();
        let count: u32 = csv.lines().nth(1).unwrap().trim().parse().unwrap();
        assert!(count <= 50);
    }

    let csv = engine.select("SELECT count(*) FROM daily").unwrap().unwrap();
    assert!(csv.contains("50"));
    assert!(!dir.path().join(".m2m/cep/scenario.sqlite").exists());
}

#[test]
fn spill_order_keeps_newest_fifty_in_memory_and_rest_in_file_db_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_in(dir.path());
    engine.set_max_record(50).unwrap();

    for date in 0..1010 {
        let csv = format!("date,name,value\r\n{date},d{date},1.0\r\n");
        engine.insert_csv("daily", &csv).unwrap();
    }

    let memory_min: i64 = {
        let csv = engine.select("SELECT min(date) AS n FROM daily").unwrap().unwrap();
        csv.lines().nth(1).unwrap().trim().parse().unwrap()
    };
    let memory_max: i64 = {
        let csv = engine.select("SELECT max(date) AS n FROM daily").unwrap().unwrap();
        csv.lines().nth(1).unwrap().trim().parse().unwrap()
    };
    assert_eq!((memory_min, memory_max), (960, 1009));

    engine.shutdown().unwrap();

    let path = dir.path().join(".m2m/cep/scenario.sqlite");
    let conn = rusqlite::Connection::open(path).unwrap();
    let (file_min, file_max): (i64, i64) = conn
        .query_row("SELECT min(date), max(date) FROM daily", [], |r| Ok((r.get(0)?, r.get(1)?)))
        .unwrap();
    assert_eq!((file_min, file_max), (0, 959));

    let in_rowid_order: Vec<i64> = conn
        .prepare("SELECT date FROM daily ORDER BY rowid")
        .unwrap()
        .query_map([], |r| r.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    let expected: Vec<i64> = (0..960).collect();
    assert_eq!(in_rowid_order, expected);
}

#[test]
fn vacuum_triggers_exactly_once_across_the_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_in(dir.path());
    engine.set_max_record(50).unwrap();
    engine.set_vacuum_record(1000);

    for date in 0..1010 {
        let csv = format!("date,name,value\r\n{date},d{date},1.0\r\n");
        engine.insert_csv("daily", &csv).unwrap();
    }

    assert!(engine.record_counter() <= 10);
}

#[test]
fn select_formatting_matches_declared_types_and_full_double_precision() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_in(dir.path());
    engine
        .insert_csv("daily", "date,name,value\r\n1,食べ物,1.0\r\n2,x,2.5\r\n")
        .unwrap();

    let csv = engine
        .select("SELECT date,name,value FROM daily ORDER BY date")
        .unwrap()
        .unwrap();
    assert_eq!(csv, "date,name,value\r\n1,食べ物,1.000000\r\n2,x,2.500000\r\n");
}

#[test]
fn bool_and_blob_columns_round_trip_through_insert_and_select() {
    let dir = tempfile::tempdir().unwrap();
    let mut catalog = Catalog::new();
    let mut columns = ColumnList::new();
    columns.append("flag", ColumnType::Bool, false, false, false, false);
    columns.append("payload", ColumnType::Blob, false, false, false, false);
    catalog.upsert("events", columns).unwrap();

    let mut engine = CepEngine::with_data_home("scenario", catalog, dir.path().to_path_buf()).unwrap();
    engine
        .insert_csv("events", "flag,payload\r\nTrue,hello world\r\nfalse,bye\r\n")
        .unwrap();

    let csv = engine
        .select("SELECT flag,payload FROM events ORDER BY rowid")
        .unwrap()
        .unwrap();
    assert_eq!(csv, "flag,payload\r\n1,aGVsbG8gd29ybGQ=\r\n0,Ynll\r\n");
}

#[test]
fn bad_csv_field_count_mismatch_is_rejected_leaving_state_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_in(dir.path());

    let err = engine
        .insert_csv("daily", "date,name,value\r\n1,only-two-fields\r\n")
        .unwrap_err();
    assert!(matches!(err, cep_core::CepError::BadInput(_)));
    assert_eq!(engine.select("SELECT count(*) FROM daily").unwrap(), None);
}
