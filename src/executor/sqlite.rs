//! SQLite-backed executor.

use std::path::Path;

use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use serde_json::{Map, Value as JsonValue};
use tracing::trace;

use super::{CountResult, QueryExecutor};
use crate::sql::{Dialect, Query, Value};

/// Errors that can occur while executing against SQLite.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("count query returned no count column")]
    MissingCountColumn,
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Int(n) => ToSqlOutput::Owned(SqlValue::Integer(*n)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

/// Executes queries rendered in the SQLite dialect.
pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    /// Open a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> ExecutorResult<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> ExecutorResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run a batch of statements (schema setup, fixtures).
    pub fn execute_batch(&self, sql: &str) -> ExecutorResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Run a query and return each row as a JSON object keyed by column name.
    pub fn fetch_rows(&self, query: &Query) -> ExecutorResult<Vec<Map<String, JsonValue>>> {
        let bound = query.to_bound_sql(Dialect::Sqlite);
        trace!(sql = %bound.sql, params = bound.params.len(), "fetch rows");

        let mut stmt = self.conn.prepare(&bound.sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let rows = stmt
            .query_map(params_from_iter(bound.params.iter()), |row| {
                let mut object = Map::with_capacity(names.len());
                for (i, name) in names.iter().enumerate() {
                    object.insert(name.clone(), json_value(row.get_ref(i)?));
                }
                Ok(object)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl QueryExecutor for SqliteExecutor {
    type Error = ExecutorError;

    fn count(&self, query: &Query) -> ExecutorResult<CountResult> {
        let bound = query.to_bound_sql(Dialect::Sqlite);
        trace!(sql = %bound.sql, params = bound.params.len(), "count");

        let mut stmt = self.conn.prepare(&bound.sql)?;
        let params = params_from_iter(bound.params.iter());

        if query.group_by.is_empty() {
            let n: i64 = stmt.query_row(params, |row| row.get(0))?;
            return Ok(CountResult::Scalar(to_count(n)));
        }

        // Grouped: key in the first column, count in the last.
        let count_idx = query
            .select
            .len()
            .checked_sub(1)
            .ok_or(ExecutorError::MissingCountColumn)?;
        let groups = stmt
            .query_map(params, |row| {
                let key = value(row.get_ref(0)?);
                let n: i64 = row.get(count_idx)?;
                Ok((key, to_count(n)))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CountResult::Grouped(groups))
    }

    fn select_ids(&self, query: &Query) -> ExecutorResult<Vec<Value>> {
        let bound = query.to_bound_sql(Dialect::Sqlite);
        trace!(sql = %bound.sql, params = bound.params.len(), "select ids");

        let mut stmt = self.conn.prepare(&bound.sql)?;
        let ids = stmt
            .query_map(params_from_iter(bound.params.iter()), |row| {
                Ok(value(row.get_ref(0)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

fn to_count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

fn value(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Int(n),
        ValueRef::Real(f) => Value::Text(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

fn json_value(v: ValueRef<'_>) -> JsonValue {
    match v {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(n) => JsonValue::from(n),
        ValueRef::Real(f) => JsonValue::from(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            JsonValue::String(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
