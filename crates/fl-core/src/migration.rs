//! Migration descriptors and filename conventions
//!
//! Migration files are named `<version>_<description>.<ext>`. The extension
//! selects how the file is executed: `.sql` files are plain SQL scripts,
//! `.go` and `.sh` files are executable scripts run as a child process.

use std::fmt;
use std::path::{Path, PathBuf};

/// Separator between the version number and the description in a filename
pub const VERSION_SEPARATOR: char = '_';

/// Direction of traversal through the migration sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Apply migrations toward a higher version
    Up,
    /// Revert migrations toward a lower version
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// How a migration file is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigrationKind {
    /// Plain SQL script with `Up`/`Down` sections
    Sql,
    /// Executable script (`.go` or `.sh`) run as a child process
    Script,
}

impl MigrationKind {
    /// Classify a path by its extension, `None` for unrecognized files
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("sql") => Some(MigrationKind::Sql),
            Some("go") | Some("sh") => Some(MigrationKind::Script),
            _ => None,
        }
    }
}

impl fmt::Display for MigrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationKind::Sql => write!(f, "sql"),
            MigrationKind::Script => write!(f, "script"),
        }
    }
}

/// A discovered migration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationSource {
    /// Path to the file
    pub path: PathBuf,

    /// Execution kind derived from the extension
    pub kind: MigrationKind,
}

impl MigrationSource {
    /// The file name, for status output
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// A migration selected into a [`crate::MigrationMap`], linked to its
/// neighbours in traversal order by version number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Version number
    pub version: i64,

    /// Underlying file
    pub source: MigrationSource,

    /// Version visited before this one, if any
    pub previous: Option<i64>,

    /// Version visited after this one, if any
    pub next: Option<i64>,
}

impl Migration {
    /// Create an unlinked migration
    pub fn new(version: i64, source: MigrationSource) -> Self {
        Self {
            version,
            source,
            previous: None,
            next: None,
        }
    }
}

/// Extract the version number from a migration filename.
///
/// The version is the integer prefix before the first `_`. Returns `None`
/// for names without a separator or with a non-numeric or negative prefix.
pub fn parse_version(file_name: &str) -> Option<i64> {
    let (prefix, _) = file_name.split_once(VERSION_SEPARATOR)?;
    prefix.parse::<i64>().ok().filter(|v| *v >= 0)
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
