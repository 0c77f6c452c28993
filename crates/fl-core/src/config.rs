//! Configuration types and parsing for flock.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config file names searched in a project directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["flock.yml", "flock.yaml"];

/// Name reported for the base database configuration
pub const DEFAULT_TARGET_NAME: &str = "default";

/// Main project configuration from flock.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Directory holding migration files, relative to the project root
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// Table that records applied versions
    #[serde(default = "default_version_table")]
    pub version_table: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Named target configurations (e.g., development, production)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Migrations directory override
    #[serde(default)]
    pub migrations_dir: Option<String>,
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Settings for one run after applying target overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Target name (`default` when none was selected)
    pub name: String,

    /// Database settings
    pub database: DatabaseConfig,

    /// Migrations directory, relative to the project root
    pub migrations_dir: String,
}

const DEFAULT_DB_PATH: &str = ":memory:";

const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

const DEFAULT_VERSION_TABLE: &str = "flock_db_version";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_migrations_dir() -> String {
    DEFAULT_MIGRATIONS_DIR.to_string()
}

fn default_version_table() -> String {
    DEFAULT_VERSION_TABLE.to_string()
}

/// Whether `name` is usable unquoted as a (optionally schema-qualified) table name
fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for flock.yml or flock.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if self.migrations_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_dir cannot be empty".to_string(),
            });
        }

        if !is_plain_identifier(&self.version_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "version_table '{}' must be a plain identifier (letters, digits, '_')",
                    self.version_table
                ),
            });
        }

        for (name, target) in &self.targets {
            if let Some(dir) = &target.migrations_dir {
                if dir.trim().is_empty() {
                    return Err(CoreError::ConfigInvalid {
                        message: format!("target '{}' has an empty migrations_dir", name),
                    });
                }
            }
        }

        Ok(())
    }

    /// Apply the overrides of the named target.
    ///
    /// `None` selects the base configuration.
    pub fn resolve_target(&self, name: Option<&str>) -> CoreResult<ResolvedTarget> {
        let Some(name) = name else {
            return Ok(ResolvedTarget {
                name: DEFAULT_TARGET_NAME.to_string(),
                database: self.database.clone(),
                migrations_dir: self.migrations_dir.clone(),
            });
        };

        let target = self.targets.get(name).ok_or_else(|| {
            let mut known: Vec<&str> = self.targets.keys().map(String::as_str).collect();
            known.sort_unstable();
            CoreError::ConfigInvalid {
                message: format!(
                    "Unknown target '{}'. Available targets: {}",
                    name,
                    if known.is_empty() {
                        "(none)".to_string()
                    } else {
                        known.join(", ")
                    }
                ),
            }
        })?;

        Ok(ResolvedTarget {
            name: name.to_string(),
            database: target
                .database
                .clone()
                .unwrap_or_else(|| self.database.clone()),
            migrations_dir: target
                .migrations_dir
                .clone()
                .unwrap_or_else(|| self.migrations_dir.clone()),
        })
    }
}

impl ResolvedTarget {
    /// Get the absolute migrations directory relative to a project root
    pub fn migrations_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_dir)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
