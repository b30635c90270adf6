use std::fmt;
use std::path::Path;

use log::debug;
use rusqlite::{
    Connection,
    params_from_iter,
    types::{ToSql, ToSqlOutput},
};

use crate::error::StoreError;
use crate::table::{Cell, TableResult};

/// A validated parameter value ready to be bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Int(i) => ToSqlOutput::from(*i),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

/// The one thing the shell needs from a database: run a parameterized query
/// and hand back its columns and display values.
pub trait Store {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<TableResult, StoreError>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(SqliteStore { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(SqliteStore { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Runs `statements` in one transaction. On failure the transaction is
    /// rolled back and the index of the failing statement is returned with
    /// the error.
    pub fn execute_batch_atomic(&self, statements: &[String]) -> Result<usize, (usize, StoreError)> {
        let tx = self.conn.unchecked_transaction().map_err(|e| (0, StoreError::from(e)))?;
        for (i, sql) in statements.iter().enumerate() {
            tx.execute_batch(sql).map_err(|e| (i, StoreError::from(e)))?;
        }
        tx.commit().map_err(|e| (statements.len(), StoreError::from(e)))?;
        Ok(statements.len())
    }
}

impl Store for SqliteStore {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<TableResult, StoreError> {
        debug!("executing with {} bound parameter(s): {}", params.len(), sql);

        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names()
                                       .into_iter()
                                       .map(String::from)
                                       .collect();
        let width = columns.len();

        let mut result = TableResult::new(columns);
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(display(row.get_ref(i)?.into()));
            }
            result.rows.push(cells);
        }

        debug!("query returned {} row(s)", result.rows.len());
        Ok(result)
    }
}

fn display(value: rusqlite::types::Value) -> Cell {
    use rusqlite::types::Value as Sql;

    match value {
        Sql::Null => None,
        Sql::Integer(i) => Some(i.to_string()),
        Sql::Real(f) => Some(f.to_string()),
        Sql::Text(s) => Some(s),
        Sql::Blob(b) => Some(format!("<{} bytes>", b.len())),
    }
}
