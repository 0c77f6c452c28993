use super::*;
use fl_core::MigrationSource;
use fl_db::DuckDbBackend;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn migration(version: i64, path: PathBuf) -> Migration {
    let kind = MigrationKind::from_path(&path).unwrap();
    Migration::new(version, MigrationSource { path, kind })
}

fn context() -> ExecutionContext {
    ExecutionContext {
        database_path: ":memory:".to_string(),
    }
}

/// File-backed database inside `dir` with a matching context
fn file_db(dir: &Path) -> (DuckDbBackend, ExecutionContext) {
    let path = dir.join("app.duckdb");
    let db = DuckDbBackend::from_path(&path).unwrap();
    let context = ExecutionContext {
        database_path: path.display().to_string(),
    };
    (db, context)
}

#[tokio::test]
async fn test_sql_up_and_down() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("1_users.sql");
    fs::write(
        &path,
        "-- +migrate Up\nCREATE TABLE users (id INT);\nINSERT INTO users VALUES (1);\n\n-- +migrate Down\nDROP TABLE users;\n",
    )
    .unwrap();
    let db = DuckDbBackend::in_memory().unwrap();
    let m = migration(1, path);

    let count = execute_migration(&db, &m, Direction::Up, &context())
        .await
        .unwrap();
    assert_eq!(count, 2);
    assert!(db.relation_exists("users").await.unwrap());

    let count = execute_migration(&db, &m, Direction::Down, &context())
        .await
        .unwrap();
    assert_eq!(count, 1);
    assert!(!db.relation_exists("users").await.unwrap());
}

#[tokio::test]
async fn test_sql_failure_rolls_back_statements() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("2_broken.sql");
    fs::write(
        &path,
        "-- +migrate Up\nCREATE TABLE half (id INT);\nINSERT INTO not_there VALUES (1);\n",
    )
    .unwrap();
    let db = DuckDbBackend::in_memory().unwrap();

    let err = execute_migration(&db, &migration(2, path), Direction::Up, &context())
        .await
        .unwrap_err();
    assert!(matches!(err, MigrateError::Db(_)));
    assert!(!db.relation_exists("half").await.unwrap());
}

#[tokio::test]
async fn test_sql_missing_section_runs_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("3_up_only.sql");
    fs::write(&path, "-- +migrate Up\nCREATE TABLE t (id INT);\n").unwrap();
    let db = DuckDbBackend::in_memory().unwrap();

    let count = execute_migration(&db, &migration(3, path), Direction::Down, &context())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_sql_unreadable_file() {
    let dir = tempdir().unwrap();
    let db = DuckDbBackend::in_memory().unwrap();
    let m = migration(4, dir.path().join("4_gone.sql"));

    let err = execute_migration(&db, &m, Direction::Up, &context())
        .await
        .unwrap_err();
    assert!(matches!(err, MigrateError::ReadScript { .. }));
}

#[tokio::test]
async fn test_sql_parse_error_surfaces() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("5_bad.sql");
    fs::write(&path, "-- +migrate Up\n-- +migrate StatementBegin\nSELECT 1;\n").unwrap();
    let db = DuckDbBackend::in_memory().unwrap();

    let err = execute_migration(&db, &migration(5, path), Direction::Up, &context())
        .await
        .unwrap_err();
    assert!(matches!(err, MigrateError::Core(_)));
}

#[test]
fn test_interpreter_for() {
    assert_eq!(interpreter_for(Path::new("1_a.go")).unwrap().0, "go");
    assert_eq!(interpreter_for(Path::new("1_a.sh")).unwrap().0, "sh");
    assert!(interpreter_for(Path::new("1_a.sql")).is_none());
}

#[test]
fn test_build_env_vars() {
    let env = build_env_vars(7, Direction::Down, &context());
    assert_eq!(env["FLOCK_DATABASE_PATH"], ":memory:");
    assert_eq!(env["FLOCK_DIRECTION"], "down");
    assert_eq!(env["FLOCK_VERSION"], "7");
}

#[cfg(unix)]
#[tokio::test]
async fn test_script_receives_direction_and_version() {
    let dir = tempdir().unwrap();
    let marker = dir.path().join("marker.txt");
    let path = dir.path().join("6_touch.sh");
    fs::write(
        &path,
        format!(
            "echo \"$FLOCK_DIRECTION $FLOCK_VERSION $1\" > '{}'\n",
            marker.display()
        ),
    )
    .unwrap();
    let (db, ctx) = file_db(dir.path());

    let count = execute_migration(&db, &migration(6, path), Direction::Up, &ctx)
        .await
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(fs::read_to_string(&marker).unwrap().trim(), "up 6 up");
    // Connection is back after the script
    assert_eq!(db.query_i64("SELECT 1").await.unwrap(), Some(1));
}

#[cfg(unix)]
#[tokio::test]
async fn test_script_failure_reports_stderr() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("7_fail.sh");
    fs::write(&path, "echo 'boom' >&2\nexit 3\n").unwrap();
    let (db, ctx) = file_db(dir.path());

    let err = execute_migration(&db, &migration(7, path), Direction::Up, &ctx)
        .await
        .unwrap_err();
    assert_eq!(db.query_i64("SELECT 1").await.unwrap(), Some(1));
    match err {
        MigrateError::ScriptFailed {
            exit_code, stderr, ..
        } => {
            assert_eq!(exit_code, 3);
            assert_eq!(stderr, "boom");
        }
        other => panic!("expected ScriptFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_script_rejected_for_in_memory_database() {
    let dir = tempdir().unwrap();
    let marker = dir.path().join("marker.txt");
    let path = dir.path().join("8_seed.sh");
    fs::write(&path, format!("touch '{}'\n", marker.display())).unwrap();
    let db = DuckDbBackend::in_memory().unwrap();

    let err = execute_migration(&db, &migration(8, path), Direction::Up, &context())
        .await
        .unwrap_err();
    assert!(matches!(err, MigrateError::ScriptNeedsFileDatabase { .. }));
    assert!(!marker.exists());
    assert!(db.query_i64("SELECT 1").await.is_ok());
}
