use crewbook_core::db::schema::schema_version as supported_schema_version;
use crewbook_core::db::{open_db, open_db_in_memory, DbError};
use crewbook_core::{RepoError, SqliteWorkerRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_worker_tables() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), supported_schema_version());
    assert_table_exists(&conn, "workers");
    assert_table_exists(&conn, "full_time_workers");
    assert_table_exists(&conn, "part_time_workers");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crewbook.sqlite3");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first), supported_schema_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), supported_schema_version());
    assert_table_exists(&second, "workers");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, supported_schema_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteWorkerRepository::try_new(conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, supported_schema_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_extension_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!(
        "CREATE TABLE workers (dni INTEGER PRIMARY KEY);
         PRAGMA user_version = {};",
        supported_schema_version()
    ))
    .unwrap();

    assert!(matches!(
        SqliteWorkerRepository::try_new(conn),
        Err(RepoError::MissingRequiredTable("full_time_workers"))
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
