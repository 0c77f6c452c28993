//! Applied version store.
//!
//! Every successful migration step appends a `(version_id, tstamp)` row to the
//! version table. The current version is the `version_id` of the newest row.
//! The table is created on first use with an initial version of 0.

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use chrono::NaiveDateTime;

/// Default name of the version table
pub const DEFAULT_VERSION_TABLE: &str = "flock_db_version";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One row of the version table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    /// Version that became current
    pub version_id: i64,

    /// When the row was written, `None` if the stored timestamp is NULL
    pub applied_at: Option<NaiveDateTime>,
}

/// Reads and appends applied version records in a single table
#[derive(Debug, Clone)]
pub struct VersionStore {
    table: String,
}

impl Default for VersionStore {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION_TABLE)
    }
}

impl VersionStore {
    /// Store backed by `table`. The name is interpolated into SQL unquoted and
    /// must be a validated identifier.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Name of the backing table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Read the newest version row
    async fn latest(&self, db: &dyn Database) -> DbResult<Option<i64>> {
        db.query_i64(&format!(
            "SELECT version_id FROM {} ORDER BY tstamp DESC, rowid DESC LIMIT 1",
            self.table
        ))
        .await
    }

    fn create_statements(&self) -> Vec<String> {
        let mut statements = Vec::new();
        if let Some((schema, _)) = self.table.rsplit_once('.') {
            statements.push(format!("CREATE SCHEMA IF NOT EXISTS {schema}"));
        }
        statements.push(format!(
            "CREATE TABLE {} (
                 version_id BIGINT NOT NULL,
                 tstamp     TIMESTAMP DEFAULT now()
             )",
            self.table
        ));
        statements
    }

    fn insert_statement(&self, version: i64) -> String {
        format!(
            "INSERT INTO {} (version_id) VALUES ({})",
            self.table, version
        )
    }

    /// Return the current version, creating the version table with an
    /// initial version of 0 when it cannot be read.
    ///
    /// Any read failure triggers the bootstrap, not only a missing table.
    /// Creation uses a plain `CREATE TABLE`, so when the read failed for some
    /// other reason on an existing table the bootstrap fails and rolls back
    /// instead of writing a second initial row.
    pub async fn ensure_current_version(&self, db: &dyn Database) -> DbResult<i64> {
        let statements = match self.latest(db).await {
            Ok(Some(version)) => return Ok(version),
            Ok(None) => {
                log::warn!(
                    "Version table {} has no rows, recording initial version 0",
                    self.table
                );
                vec![self.insert_statement(0)]
            }
            Err(e) => {
                match &e {
                    DbError::TableNotFound(_) => {
                        log::debug!("Version table {} not found, creating it", self.table)
                    }
                    other => log::warn!(
                        "Reading current version from {} failed ({}), bootstrapping",
                        self.table,
                        other
                    ),
                }
                let mut statements = self.create_statements();
                statements.push(self.insert_statement(0));
                statements
            }
        };

        db.execute_in_transaction(&statements)
            .await
            .map_err(|e| DbError::BootstrapError(format!("{}: {e}", self.table)))?;
        Ok(0)
    }

    /// Append a row making `version` current
    pub async fn record_version(&self, db: &dyn Database, version: i64) -> DbResult<()> {
        db.execute(&self.insert_statement(version)).await?;
        Ok(())
    }

    /// All version rows, newest first
    pub async fn history(&self, db: &dyn Database) -> DbResult<Vec<VersionRecord>> {
        let rows = db
            .query_rows(&format!(
                "SELECT version_id, CAST(tstamp AS VARCHAR) FROM {} ORDER BY tstamp DESC, rowid DESC",
                self.table
            ))
            .await?;

        rows.into_iter()
            .map(|row| self.decode(&row))
            .collect()
    }

    fn decode(&self, row: &[String]) -> DbResult<VersionRecord> {
        let invalid = |message: String| DbError::InvalidData {
            table: self.table.clone(),
            message,
        };

        let [version, tstamp] = row else {
            return Err(invalid(format!("expected 2 columns, got {}", row.len())));
        };

        let version_id = version
            .parse::<i64>()
            .map_err(|e| invalid(format!("version_id '{version}': {e}")))?;

        let applied_at = if tstamp == "NULL" {
            None
        } else {
            Some(
                NaiveDateTime::parse_from_str(tstamp, TIMESTAMP_FORMAT)
                    .map_err(|e| invalid(format!("tstamp '{tstamp}': {e}")))?,
            )
        };

        Ok(VersionRecord {
            version_id,
            applied_at,
        })
    }
}

#[cfg(test)]
#[path = "version_store_test.rs"]
mod tests;
