use std::collections::HashMap;
use std::path::Path;

use rusqlite::types::{ToSqlOutput, Type, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, Row, Statement, ToSql};

use super::{SqlRow, SqlValue, StorageHandle};
use crate::error::{Result, SamplerError};

// ---------------------------------------------------------------------------
// GridDb – one blocking session against a SQLite grid database
// ---------------------------------------------------------------------------

/// A [`StorageHandle`] backed by rusqlite.
///
/// Named statements keep their SQL text here and execute through the
/// connection's statement cache, so the per-candidate query is compiled
/// once and re-stepped with fresh parameters afterwards. The connection
/// closes on drop, which releases the session on every exit path.
pub struct GridDb {
    conn: Connection,
    prepared: HashMap<String, String>,
}

impl GridDb {
    /// Open a grid database file.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(GridDb {
            conn: Connection::open(path)?,
            prepared: HashMap::new(),
        })
    }

    /// Fresh in-memory database; the fixture for tests and demos.
    pub fn open_in_memory() -> Result<Self> {
        Ok(GridDb {
            conn: Connection::open_in_memory()?,
            prepared: HashMap::new(),
        })
    }

    /// Run one non-query statement (DDL, insert). Returns affected rows.
    pub fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<usize> {
        Ok(self.conn.execute(sql, params_from_iter(params.iter()))?)
    }

    /// Run a batch of semicolon-separated statements (schema setup).
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        Ok(self.conn.execute_batch(sql)?)
    }
}

impl StorageHandle for GridDb {
    fn fetch_all(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>> {
        let mut stmt = self.conn.prepare(sql)?;
        fetch_rows(&mut stmt, params)
    }

    fn prepare_named(&mut self, name: &str, sql: &str) -> Result<()> {
        if self.prepared.contains_key(name) {
            return Err(SamplerError::invalid_argument(format!(
                "prepared statement \"{name}\" already exists"
            )));
        }
        // Compile once up front so syntax errors surface at definition
        // time, like a server-side PREPARE would.
        self.conn.prepare(sql)?;
        self.prepared.insert(name.to_owned(), sql.to_owned());
        Ok(())
    }

    fn has_prepared_statement(&self, name: &str) -> bool {
        self.prepared.contains_key(name)
    }

    fn deallocate(&mut self, name: &str) -> Result<()> {
        self.prepared.remove(name).map(|_| ()).ok_or_else(|| {
            SamplerError::invalid_argument(format!("prepared statement \"{name}\" is not defined"))
        })
    }

    fn execute_prepared(&mut self, name: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>> {
        let sql = self.prepared.get(name).ok_or_else(|| {
            SamplerError::invalid_argument(format!("prepared statement \"{name}\" is not defined"))
        })?;
        let mut stmt = self.conn.prepare_cached(sql)?;
        fetch_rows(&mut stmt, params)
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(match self {
            SqlValue::Integer(v) => Value::Integer(*v),
            SqlValue::Real(v) => Value::Real(*v),
            SqlValue::Text(s) => Value::Text(s.clone()),
            SqlValue::Null => Value::Null,
        }))
    }
}

// -- Row helpers --

fn cell(row: &Row<'_>, idx: usize) -> rusqlite::Result<SqlValue> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => SqlValue::Null,
        ValueRef::Integer(v) => SqlValue::Integer(v),
        ValueRef::Real(v) => SqlValue::Real(v),
        ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => {
            return Err(rusqlite::Error::InvalidColumnType(
                idx,
                "blob column in grid query".to_owned(),
                Type::Blob,
            ))
        }
    })
}

fn fetch_rows(stmt: &mut Statement<'_>, params: &[SqlValue]) -> Result<Vec<SqlRow>> {
    let n_cols = stmt.column_count();
    let mapped = stmt.query_map(params_from_iter(params.iter()), |row| {
        (0..n_cols).map(|i| cell(row, i)).collect()
    })?;
    let mut rows = Vec::new();
    for row in mapped {
        rows.push(row?);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
