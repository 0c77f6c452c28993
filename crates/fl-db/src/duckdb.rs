//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use async_trait::async_trait;
use duckdb::types::Value;
use duckdb::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Option<Connection>>,
    /// Backing file, `None` for in-memory databases
    path: Option<PathBuf>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            path: None,
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = open_file(path)?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Option<Connection>>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Run `f` against the open connection
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> DbResult<T>) -> DbResult<T> {
        let guard = self.lock()?;
        let conn = guard.as_ref().ok_or_else(|| {
            DbError::ConnectionError("connection is released; reopen it first".to_string())
        })?;
        f(conn)
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        self.with_conn(|conn| conn.execute(sql, []).map_err(DbError::from))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        self.with_conn(|conn| conn.execute_batch(sql).map_err(DbError::from))
    }

    /// Run statements between `BEGIN` and `COMMIT`, rolling back on error.
    fn transaction_sync(&self, statements: &[String]) -> DbResult<usize> {
        self.with_conn(|conn| transaction_on(conn, statements))
    }

    /// Query a single integer synchronously
    fn query_i64_sync(&self, sql: &str) -> DbResult<Option<i64>> {
        self.with_conn(|conn| {
            match conn.query_row(sql, [], |row| row.get::<_, Option<i64>>(0)) {
                Ok(value) => Ok(value),
                Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(DbError::from(e)),
            }
        })
    }

    /// Query rows synchronously, rendering each value as text
    fn query_rows_sync(&self, sql: &str) -> DbResult<Vec<Vec<String>>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let mut rows = stmt.query([])?;
            let column_count = rows.as_ref().map_or(0, |s| s.column_count());

            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    let value: Value = row.get(i)?;
                    values.push(render_value(value));
                }
                out.push(values);
            }
            Ok(out)
        })
    }

    /// Check if relation exists synchronously
    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        // Handle schema-qualified names
        let (schema, table) = if let Some(pos) = name.rfind('.') {
            (&name[..pos], &name[pos + 1..])
        } else {
            ("main", name)
        };

        let count: i64 = self.with_conn(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))
        })?;

        Ok(count > 0)
    }

    /// Close the file connection so another process can open the database
    fn release_sync(&self) -> DbResult<()> {
        if self.path.is_none() {
            return Err(DbError::ConnectionError(
                "an in-memory database cannot be released".to_string(),
            ));
        }
        let mut guard = self.lock()?;
        if let Some(conn) = guard.take() {
            conn.close()
                .map_err(|(_, e)| DbError::ConnectionError(format!("close failed: {e}")))?;
        }
        Ok(())
    }

    /// Reopen a connection closed by [`Self::release_sync`]
    fn reopen_sync(&self) -> DbResult<()> {
        let mut guard = self.lock()?;
        if guard.is_some() {
            return Ok(());
        }
        let Some(path) = &self.path else {
            return Err(DbError::ConnectionError(
                "an in-memory database cannot be reopened".to_string(),
            ));
        };
        *guard = Some(open_file(path)?);
        Ok(())
    }
}

fn open_file(path: &Path) -> DbResult<Connection> {
    Connection::open(path)
        .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))
}

/// Run statements between `BEGIN` and `COMMIT`, rolling back on error.
fn transaction_on(conn: &Connection, statements: &[String]) -> DbResult<usize> {
    conn.execute_batch("BEGIN TRANSACTION")
        .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

    for (idx, statement) in statements.iter().enumerate() {
        if let Err(e) = conn.execute_batch(statement) {
            let _ = conn.execute_batch("ROLLBACK");
            log::debug!("Rolled back after statement {} failed", idx + 1);
            return Err(DbError::from(e));
        }
    }

    if let Err(commit_err) = conn.execute_batch("COMMIT") {
        let _ = conn.execute_batch("ROLLBACK");
        return Err(DbError::TransactionError(format!(
            "COMMIT failed: {commit_err}"
        )));
    }
    Ok(statements.len())
}

/// Render a DuckDB value the way it would print in a result table
fn render_value(value: Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::TinyInt(i) => i.to_string(),
        Value::SmallInt(i) => i.to_string(),
        Value::Int(i) => i.to_string(),
        Value::BigInt(i) => i.to_string(),
        Value::HugeInt(i) => i.to_string(),
        Value::UTinyInt(i) => i.to_string(),
        Value::USmallInt(i) => i.to_string(),
        Value::UInt(i) => i.to_string(),
        Value::UBigInt(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Double(f) => f.to_string(),
        Value::Text(s) => s,
        other => format!("{other:?}"),
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn execute_in_transaction(&self, statements: &[String]) -> DbResult<usize> {
        self.transaction_sync(statements)
    }

    async fn query_i64(&self, sql: &str) -> DbResult<Option<i64>> {
        self.query_i64_sync(sql)
    }

    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<String>>> {
        self.query_rows_sync(sql)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    fn release(&self) -> DbResult<()> {
        self.release_sync()
    }

    fn reopen(&self) -> DbResult<()> {
        self.reopen_sync()
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
