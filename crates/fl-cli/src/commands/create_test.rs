use super::*;
use std::fs;
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

#[test]
fn test_slugify() {
    assert_eq!(slugify("add users"), "add_users");
    assert_eq!(slugify("  Add-Users Table!  "), "add_users_table");
    assert_eq!(slugify("***"), "");
}

#[tokio::test]
async fn test_create_first_migration_makes_directory() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("flock.yml"), "name: test_project\n").unwrap();

    let args = CreateArgs {
        name: "create users".to_string(),
        kind: CreateKind::Sql,
    };
    execute(&args, &global(temp_dir.path())).await.unwrap();

    let path = temp_dir.path().join("migrations").join("1_create_users.sql");
    let content = fs::read_to_string(path).unwrap();
    assert!(content.starts_with("-- Created "));
    assert!(content.contains("-- +migrate Up"));
    assert!(content.contains("-- +migrate Down"));
}

#[tokio::test]
async fn test_create_uses_next_version() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("flock.yml"), "name: test_project\n").unwrap();
    let migrations = temp_dir.path().join("migrations");
    fs::create_dir_all(&migrations).unwrap();
    fs::write(migrations.join("7_existing.sql"), "-- +migrate Up\n").unwrap();

    let args = CreateArgs {
        name: "backfill".to_string(),
        kind: CreateKind::Sh,
    };
    execute(&args, &global(temp_dir.path())).await.unwrap();

    let content = fs::read_to_string(migrations.join("8_backfill.sh")).unwrap();
    assert!(content.starts_with("#!/bin/sh\n# Created "));
}

#[test]
fn test_create_refuses_to_overwrite() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("1_seed.go"), "package main\n").unwrap();

    let err = create_migration(temp_dir.path(), 1, "seed", CreateKind::Go).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("1_seed.go")).unwrap(),
        "package main\n"
    );
}

#[test]
fn test_create_rejects_empty_name() {
    let temp_dir = tempdir().unwrap();
    assert!(create_migration(temp_dir.path(), 1, "!!", CreateKind::Sql).is_err());
}
