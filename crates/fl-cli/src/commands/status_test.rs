use super::*;
use crate::cli::UpArgs;
use crate::commands::up;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn global(root: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: root.to_path_buf(),
        config: None,
        target: None,
        database: None,
    }
}

fn setup_project(root: &Path) {
    fs::write(
        root.join("flock.yml"),
        "name: test_project\ndatabase:\n  path: app.duckdb\n",
    )
    .unwrap();
    let migrations = root.join("migrations");
    fs::create_dir_all(&migrations).unwrap();
    fs::write(
        migrations.join("1_first.sql"),
        "-- +migrate Up\nCREATE TABLE first (id INT);\n",
    )
    .unwrap();
    fs::write(
        migrations.join("2_second.sql"),
        "-- +migrate Up\nCREATE TABLE second (id INT);\n",
    )
    .unwrap();
}

#[tokio::test]
async fn test_status_after_partial_migration() {
    let temp_dir = tempdir().unwrap();
    setup_project(temp_dir.path());

    let up_args = UpArgs {
        to: Some(1),
        dry_run: false,
    };
    up::execute(&up_args, &global(temp_dir.path())).await.unwrap();

    for output in [StatusOutput::Table, StatusOutput::Json] {
        let args = StatusArgs { output };
        execute(&args, &global(temp_dir.path())).await.unwrap();
    }
}

#[tokio::test]
async fn test_status_without_migrations_directory_fails() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("flock.yml"), "name: test_project\n").unwrap();

    let args = StatusArgs {
        output: StatusOutput::Table,
    };
    assert!(execute(&args, &global(temp_dir.path())).await.is_err());
}

#[test]
fn test_status_serializes_pending_without_timestamp() {
    let status = MigrationStatus {
        version: 4,
        file: "4_add_index.sql".to_string(),
        kind: "sql".to_string(),
        applied: false,
        applied_at: None,
    };
    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["version"], 4);
    assert_eq!(json["applied"], false);
    assert!(json["applied_at"].is_null());
}

fn record(version_id: i64, at: &str) -> VersionRecord {
    VersionRecord {
        version_id,
        applied_at: Some(NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M:%S").unwrap()),
    }
}

#[test]
fn test_applied_times_ignore_rollback_rows() {
    // Newest first: up to 3, roll back to 2, roll back to 1
    let history = vec![
        record(1, "2026-01-05 00:00:00"),
        record(2, "2026-01-04 00:00:00"),
        record(3, "2026-01-03 00:00:00"),
        record(2, "2026-01-02 00:00:00"),
        record(1, "2026-01-01 12:00:00"),
        record(0, "2026-01-01 00:00:00"),
    ];
    let times = up_applied_times(&history);
    assert_eq!(times[&1], record(1, "2026-01-01 12:00:00").applied_at.unwrap());
    assert_eq!(times[&2], record(2, "2026-01-02 00:00:00").applied_at.unwrap());
    assert_eq!(times[&3], record(3, "2026-01-03 00:00:00").applied_at.unwrap());
    assert!(!times.contains_key(&0));
}

#[test]
fn test_applied_times_use_latest_reapply() {
    // Newest first: redo of 2 after a rollback
    let history = vec![
        record(2, "2026-02-03 00:00:00"),
        record(1, "2026-02-02 00:00:00"),
        record(2, "2026-02-01 00:00:00"),
        record(1, "2026-01-31 00:00:00"),
        record(0, "2026-01-30 00:00:00"),
    ];
    let times = up_applied_times(&history);
    assert_eq!(times[&2], record(2, "2026-02-03 00:00:00").applied_at.unwrap());
    assert_eq!(times[&1], record(1, "2026-01-31 00:00:00").applied_at.unwrap());
}
