use std::time::Duration;
use tablekit_core::db::{open_db, open_db_in_memory, open_db_with, DbError, DbOptions, DbTarget};

#[test]
fn open_db_in_memory_enables_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(foreign_keys(&conn), 1);
}

#[test]
fn options_can_disable_foreign_keys() {
    let options = DbOptions {
        foreign_keys: false,
        busy_timeout: Duration::from_millis(250),
    };
    let conn = open_db_with(&DbTarget::Memory, &options).unwrap();
    assert_eq!(foreign_keys(&conn), 0);
}

#[test]
fn file_database_keeps_data_between_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tablekit.db");

    let first = open_db(&path).unwrap();
    first
        .execute_batch("CREATE TABLE cars (id INTEGER PRIMARY KEY); INSERT INTO cars DEFAULT VALUES;")
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM cars;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("tablekit.db");

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}

fn foreign_keys(conn: &rusqlite::Connection) -> i64 {
    conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap()
}
