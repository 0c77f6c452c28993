//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Database abstraction trait for Flock
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a single SQL statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute `statements` in order inside one transaction.
    ///
    /// Rolls back and returns the first error if any statement fails.
    /// Returns the number of statements executed.
    async fn execute_in_transaction(&self, statements: &[String]) -> DbResult<usize>;

    /// Return the first column of the first row as an integer, `None` when
    /// the query produces no rows or a NULL value
    async fn query_i64(&self, sql: &str) -> DbResult<Option<i64>>;

    /// Run a query and render every value as text
    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<String>>>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Close the underlying connection so another process can open the
    /// database. Other calls fail until [`Database::reopen`] succeeds.
    fn release(&self) -> DbResult<()>;

    /// Reopen a connection closed by [`Database::release`]. A no-op when the
    /// connection is open.
    fn reopen(&self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
