//! Migration catalog: discovery of versioned migration files

use crate::error::{CoreError, CoreResult};
use crate::migration::{parse_version, MigrationKind, MigrationSource};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// All recognized migration files in a directory, keyed by version
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<i64, MigrationSource>,
}

impl Catalog {
    /// Scan `dir` for migration files.
    ///
    /// Files with an unrecognized extension or without a `<version>_` prefix
    /// are skipped. Two files with the same version are an error.
    pub fn discover(dir: &Path) -> CoreResult<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| CoreError::Discovery {
            path: dir.display().to_string(),
            source: e,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::Discovery {
                path: dir.display().to_string(),
                source: e,
            })?;
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            paths.push(entry.path());
        }

        // read_dir order is platform dependent
        paths.sort();

        let catalog = Self::from_paths(paths)?;
        log::debug!(
            "Discovered {} migration(s) in {}",
            catalog.len(),
            dir.display()
        );
        Ok(catalog)
    }

    /// Build a catalog from candidate file paths
    pub fn from_paths<I>(paths: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut entries: BTreeMap<i64, MigrationSource> = BTreeMap::new();

        for path in paths {
            let Some(kind) = MigrationKind::from_path(&path) else {
                continue;
            };
            let Some(version) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(parse_version)
            else {
                continue;
            };

            if let Some(existing) = entries.get(&version) {
                return Err(CoreError::AmbiguousVersion {
                    version,
                    first: existing.path.display().to_string(),
                    second: path.display().to_string(),
                });
            }

            entries.insert(version, MigrationSource { path, kind });
        }

        Ok(Self { entries })
    }

    /// Highest version in the catalog, `None` when empty
    pub fn most_recent_version(&self) -> Option<i64> {
        self.entries.keys().next_back().copied()
    }

    /// Largest version strictly below `version`
    pub fn version_before(&self, version: i64) -> Option<i64> {
        self.entries.range(..version).next_back().map(|(v, _)| *v)
    }

    /// Version to use for a newly created migration file
    pub fn next_version(&self) -> i64 {
        self.most_recent_version().map_or(1, |v| v + 1)
    }

    /// Look up a migration file by version
    pub fn get(&self, version: i64) -> Option<&MigrationSource> {
        self.entries.get(&version)
    }

    /// Whether a file exists for `version`
    pub fn contains(&self, version: i64) -> bool {
        self.entries.contains_key(&version)
    }

    /// Iterate over migrations in ascending version order
    pub fn iter(&self) -> impl Iterator<Item = (i64, &MigrationSource)> {
        self.entries.iter().map(|(v, s)| (*v, s))
    }

    /// Number of migrations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no migrations were found
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
