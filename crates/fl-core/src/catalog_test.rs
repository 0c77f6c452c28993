use super::*;
use std::fs;
use tempfile::tempdir;

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), "").unwrap();
}

fn catalog_of(names: &[&str]) -> CoreResult<Catalog> {
    Catalog::from_paths(names.iter().map(|n| PathBuf::from("migrations").join(n)))
}

#[test]
fn test_discover_recognized_files() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "1_create_users.sql");
    touch(dir.path(), "2_backfill.go");
    touch(dir.path(), "3_notify.sh");

    let catalog = Catalog::discover(dir.path()).unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.get(1).unwrap().kind, MigrationKind::Sql);
    assert_eq!(catalog.get(2).unwrap().kind, MigrationKind::Script);
    assert_eq!(catalog.get(3).unwrap().kind, MigrationKind::Script);
}

#[test]
fn test_discover_skips_unrelated_files() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "12_add_users.sql");
    touch(dir.path(), "addusers.sql");
    touch(dir.path(), "abc_users.sql");
    touch(dir.path(), "13_notes.txt");
    touch(dir.path(), "README.md");
    fs::create_dir(dir.path().join("14_archive.sql")).unwrap();

    let catalog = Catalog::discover(dir.path()).unwrap();
    let versions: Vec<i64> = catalog.iter().map(|(v, _)| v).collect();
    assert_eq!(versions, vec![12]);
}

#[test]
fn test_discover_missing_directory() {
    let dir = tempdir().unwrap();
    let err = Catalog::discover(&dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, CoreError::Discovery { .. }));
    assert!(err.to_string().contains("[F001]"));
}

#[test]
fn test_discover_duplicate_version_across_kinds() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "003_a.sql");
    touch(dir.path(), "003_b.go");

    let err = Catalog::discover(dir.path()).unwrap_err();
    match err {
        CoreError::AmbiguousVersion {
            version,
            first,
            second,
        } => {
            assert_eq!(version, 3);
            assert!(first.ends_with("003_a.sql"));
            assert!(second.ends_with("003_b.go"));
        }
        other => panic!("expected AmbiguousVersion, got {other:?}"),
    }
}

#[test]
fn test_duplicate_version_with_different_padding() {
    let err = catalog_of(&["3_a.sql", "0003_b.sql"]).unwrap_err();
    assert!(matches!(err, CoreError::AmbiguousVersion { version: 3, .. }));
}

#[test]
fn test_most_recent_version() {
    let catalog = catalog_of(&["1_a.sql", "10_b.sql", "7_c.go", "99_ignored.txt"]).unwrap();
    assert_eq!(catalog.most_recent_version(), Some(10));
}

#[test]
fn test_most_recent_version_empty() {
    let catalog = catalog_of(&[]).unwrap();
    assert_eq!(catalog.most_recent_version(), None);
    assert!(catalog.is_empty());

    let catalog = catalog_of(&["notes.sql", "x_y.sql"]).unwrap();
    assert_eq!(catalog.most_recent_version(), None);
}

#[test]
fn test_version_before() {
    let catalog = catalog_of(&["1_a.sql", "4_b.sql", "9_c.sql"]).unwrap();
    assert_eq!(catalog.version_before(9), Some(4));
    assert_eq!(catalog.version_before(5), Some(4));
    assert_eq!(catalog.version_before(4), Some(1));
    assert_eq!(catalog.version_before(1), None);
}

#[test]
fn test_next_version() {
    assert_eq!(catalog_of(&[]).unwrap().next_version(), 1);
    assert_eq!(catalog_of(&["5_a.sql"]).unwrap().next_version(), 6);
}

#[test]
fn test_iter_is_ascending() {
    let catalog = catalog_of(&["30_c.sql", "2_a.sql", "11_b.sql"]).unwrap();
    let versions: Vec<i64> = catalog.iter().map(|(v, _)| v).collect();
    assert_eq!(versions, vec![2, 11, 30]);
    assert!(catalog.contains(11));
    assert!(!catalog.contains(12));
}
