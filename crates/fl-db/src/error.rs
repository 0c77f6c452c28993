//! Error types for fl-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Transaction management error (D004)
    #[error("[D004] Transaction failed: {0}")]
    TransactionError(String),

    /// Version table could not be created or initialized (D005)
    #[error("[D005] Version store bootstrap failed: {0}")]
    BootstrapError(String),

    /// Mutex poisoned (D006)
    #[error("[D006] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Stored data could not be decoded (D007)
    #[error("[D007] Invalid data in {table}: {message}")]
    InvalidData { table: String, message: String },
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured variants, so the
        // catalog error message is the only signal for a missing table.
        let msg = err.to_string();
        if msg.contains("Table with name")
            || msg.contains("View with name")
            || msg.contains("Table or view with name")
            || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not found"))
        {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
