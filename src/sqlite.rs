//! rusqlite-backed implementation of the executor capability.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::types::{ToSqlOutput, Value as SqliteValue, ValueRef};
use rusqlite::{Connection, ToSql};
use tracing::{debug, info};

use crate::error::MapperResult;
use crate::executor::{SqlExecutor, SqlQuery};
use crate::row::{Row, Rows};
use crate::value::Value;

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqliteValue::Null),
            Value::Integer(i) => ToSqlOutput::Owned(SqliteValue::Integer(*i)),
            Value::Real(r) => ToSqlOutput::Owned(SqliteValue::Real(*r)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
            Value::Boolean(b) => ToSqlOutput::Owned(SqliteValue::Integer(*b as i64)),
        })
    }
}

impl From<SqliteValue> for Value {
    fn from(value: SqliteValue) -> Self {
        match value {
            SqliteValue::Null => Value::Null,
            SqliteValue::Integer(i) => Value::Integer(i),
            SqliteValue::Real(r) => Value::Real(r),
            SqliteValue::Text(s) => Value::Text(s),
            SqliteValue::Blob(b) => Value::Blob(b),
        }
    }
}

/// SQLite-backed [`SqlExecutor`] over a single shared connection.
///
/// rusqlite is synchronous; each call does its work inline and the lock
/// serializes statements. Pooling or smarter scheduling belongs to the
/// caller.
pub struct SqliteExecutor {
    conn: Mutex<Connection>,
}

impl SqliteExecutor {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> MapperResult<Self> {
        info!(path = %path.as_ref().display(), "opening sqlite database");
        let conn = Connection::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> MapperResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run a batch of bootstrap statements (schema creation and the like),
    /// outside the mapper's surface.
    pub fn run_batch(&self, sql: &str) -> MapperResult<()> {
        let conn = self.conn.lock().expect("connection mutex poisoned");
        conn.execute_batch(sql)?;
        Ok(())
    }

    fn run(conn: &Connection, query: &SqlQuery) -> MapperResult<Rows> {
        debug!(statement = %query.statement, params = query.params.len(), "execute");
        let mut stmt = conn.prepare(&query.statement)?;
        let columns: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        // DML statements have no result columns.
        if columns.is_empty() {
            stmt.execute(rusqlite::params_from_iter(query.params.iter()))?;
            return Ok(Rows::default());
        }
        let mut rows = stmt.query(rusqlite::params_from_iter(query.params.iter()))?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut out = Row::new();
            for (index, name) in columns.iter().enumerate() {
                let cell: SqliteValue = row.get(index)?;
                out.push(name.clone(), cell.into());
            }
            collected.push(out);
        }
        Ok(Rows::new(collected))
    }
}

#[async_trait]
impl SqlExecutor for SqliteExecutor {
    async fn execute(&self, query: SqlQuery) -> MapperResult<Rows> {
        let conn = self.conn.lock().expect("connection mutex poisoned");
        Self::run(&conn, &query)
    }

    async fn execute_all(&self, queries: Vec<SqlQuery>) -> MapperResult<()> {
        let mut conn = self.conn.lock().expect("connection mutex poisoned");
        let tx = conn.transaction()?;
        for query in &queries {
            tx.execute(
                &query.statement,
                rusqlite::params_from_iter(query.params.iter()),
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
