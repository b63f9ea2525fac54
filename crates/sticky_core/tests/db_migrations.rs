use rusqlite::Connection;
use sticky_core::db::migrations::apply_migrations;
use sticky_core::db::{latest_version, open_db, open_db_in_memory, schema_version, DbError};
use sticky_core::{SqliteStateRepository, StateKey, StateRepository};

#[test]
fn fresh_file_is_migrated_from_version_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    let mut conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 0);

    let report = apply_migrations(&mut conn).unwrap();
    assert!(report.applied());
    assert_eq!(report.from_version, 0);
    assert_eq!(report.to_version, latest_version());

    let again = apply_migrations(&mut conn).unwrap();
    assert!(!again.applied());
}

#[test]
fn kv_entries_fills_updated_at_when_omitted() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv_entries (key, value) VALUES ('viewMode', '\"list\"');",
        [],
    )
    .unwrap();

    let updated_at: i64 = conn
        .query_row(
            "SELECT updated_at FROM kv_entries WHERE key = 'viewMode';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(updated_at > 1_600_000_000_000, "expected epoch millis, got {updated_at}");

    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    assert_eq!(
        repo.get(StateKey::ViewMode).unwrap().as_deref(),
        Some("\"list\"")
    );
}

#[test]
fn upserted_values_survive_reopen_without_remigrating() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stickynotes.db");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteStateRepository::try_new(&conn).unwrap();
        repo.put(StateKey::SelectedBoard, "1").unwrap();
        repo.put(StateKey::SelectedBoard, "2").unwrap();
    }

    let mut conn = open_db(&path).unwrap();
    assert!(!apply_migrations(&mut conn).unwrap().applied());

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
    let repo = SqliteStateRepository::try_new(&conn).unwrap();
    assert_eq!(repo.get(StateKey::SelectedBoard).unwrap().as_deref(), Some("2"));
}

#[test]
fn newer_schema_is_rejected_and_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 999);
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE name = 'kv_entries';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 0);
}
