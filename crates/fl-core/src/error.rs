//! Error types for fl-core

use thiserror::Error;

/// Core error type for Flock
#[derive(Error, Debug)]
pub enum CoreError {
    /// F001: Migrations directory could not be read
    #[error("[F001] Cannot read migrations directory {path}: {source}")]
    Discovery {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// F002: Two migration files claim the same version
    #[error("[F002] More than one file specifies the migration for version {version} ({first} and {second})")]
    AmbiguousVersion {
        version: i64,
        first: String,
        second: String,
    },

    /// F003: Configuration file not found
    #[error("[F003] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// F004: Failed to parse configuration file
    #[error("[F004] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// F005: Invalid configuration value
    #[error("[F005] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// F006: Malformed SQL migration script
    #[error("[F006] SQL migration parse error at line {line}: {message}")]
    ScriptParse { line: usize, message: String },

    /// F007: IO error with file path context
    #[error("[F007] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::ConfigParseError {
            message: err.to_string(),
        }
    }
}
