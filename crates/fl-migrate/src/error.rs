//! Error types for fl-migrate

use fl_core::CoreError;
use fl_db::DbError;
use thiserror::Error;

/// Migration execution errors
#[derive(Error, Debug)]
pub enum MigrateError {
    /// A migration step failed; versions in `applied` stay applied (R001)
    #[error("[R001] Migration {version} ({file}) failed: {message}")]
    StepFailed {
        version: i64,
        file: String,
        message: String,
        applied: Vec<i64>,
    },

    /// Migration file could not be read (R002)
    #[error("[R002] Failed to read migration {path}: {source}")]
    ReadScript {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Script migration could not be started (R003)
    #[error("[R003] Failed to launch {program} for {path}: {source}")]
    ScriptLaunch {
        program: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Script migration exited unsuccessfully (R004)
    #[error("[R004] Script {path} exited with status {exit_code}: {stderr}")]
    ScriptFailed {
        path: String,
        exit_code: i32,
        stderr: String,
    },

    /// Unsupported script extension (R005)
    #[error("[R005] No interpreter known for script {path}")]
    NoInterpreter { path: String },

    /// Script migration run against an in-memory database (R006)
    #[error("[R006] Script migration {path} needs a file database; ':memory:' is not visible to child processes")]
    ScriptNeedsFileDatabase { path: String },

    /// Core error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database error
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
