//! A shut-down engine's spilled rows must be visible to a fresh engine
//! instance pointed at the same data home.

use cep_core::{Catalog, CepEngine, ColumnList, ColumnType};

fn daily_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    let mut columns = ColumnList::new();
    columns.append("date", ColumnType::Datetime, false, false, false, false);
    columns.append("name", ColumnType::Text, false, false, false, false);
    catalog.upsert("daily", columns).unwrap();
    catalog
}

#[test]
fn rows_spilled_before_shutdown_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    let mut engine = CepEngine::with_data_home("restart", daily_catalog(), dir.path().to_path_buf()).unwrap();
    engine.set_max_record(5).unwrap();
    for date in 0..20 {
        let csv = format!("date,name\r\n{date},row{date}\r\n");
        engine.insert_csv("daily", &csv).unwrap();
    }
    engine.shutdown().unwrap();

    let reopened = CepEngine::with_data_home("restart", daily_catalog(), dir.path().to_path_buf()).unwrap();
    let path = dir.path().join(".m2m/cep/restart.sqlite");
    let conn = rusqlite::Connection::open(path).unwrap();
    let count: i64 = conn.query_row("SELECT count(*) FROM daily", [], |r| r.get(0)).unwrap();
    assert_eq!(count, 20);

    // The fresh in-memory window starts empty regardless of what's on disk.
    assert_eq!(reopened.select("SELECT * FROM daily").unwrap(), None);
}

#[test]
fn shutdown_flushes_rows_still_under_the_window_cap() {
    let dir = tempfile::tempdir().unwrap();

    let mut engine = CepEngine::with_data_home("small", daily_catalog(), dir.path().to_path_buf()).unwrap();
    engine.set_max_record(50).unwrap();
    engine.insert_csv("daily", "date,name\r\n1,only\r\n").unwrap();
    engine.shutdown().unwrap();

    let path = dir.path().join(".m2m/cep/small.sqlite");
    let conn = rusqlite::Connection::open(path).unwrap();
    let count: i64 = conn.query_row("SELECT count(*) FROM daily", [], |r| r.get(0)).unwrap();
    assert_eq!(count, 1, "shutdown must spill rows never evicted during normal operation");
}
