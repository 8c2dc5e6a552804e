//! Storage layer: the narrow contract the pipeline needs from a relational
//! engine, plus a SQLite implementation of it.
//!
//! Every access is a blocking round trip; the pipeline optimises for call
//! count (batch lookups, one reusable prepared statement), not parallelism.

pub mod lookup;
pub mod query;
pub mod sqlite;

use std::fmt;

use crate::error::{Result, SamplerError};

// ---------------------------------------------------------------------------
// SqlValue – a single cell of a fetched row
// ---------------------------------------------------------------------------

/// A dynamically-typed SQL cell, mirroring the storage classes the grid
/// schema actually uses.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Real(f64),
    Text(String),
    Null,
}

impl SqlValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Interpret the cell as an `f64`; integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Real(v) => Some(*v),
            SqlValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Integer(v) => write!(f, "{v}"),
            SqlValue::Real(v) => write!(f, "{v}"),
            SqlValue::Text(s) => write!(f, "{s}"),
            SqlValue::Null => write!(f, "<null>"),
        }
    }
}

/// One fetched row.
pub type SqlRow = Vec<SqlValue>;

/// Decode one integer column of a fetched row.
pub(crate) fn field_i64(row: &SqlRow, idx: usize) -> Result<i64> {
    row.get(idx)
        .and_then(SqlValue::as_i64)
        .ok_or_else(|| SamplerError::decode(format!("column {idx}: expected an integer cell")))
}

/// Decode one float column of a fetched row (integers widen).
pub(crate) fn field_f64(row: &SqlRow, idx: usize) -> Result<f64> {
    row.get(idx)
        .and_then(SqlValue::as_f64)
        .ok_or_else(|| SamplerError::decode(format!("column {idx}: expected a numeric cell")))
}

// ---------------------------------------------------------------------------
// StorageHandle – what the pipeline needs from a storage engine
// ---------------------------------------------------------------------------

/// The pipeline's storage contract.
///
/// Beyond plain parameterized queries, the handle manages *named* reusable
/// statements: the per-candidate frequency query is defined once and
/// executed thousands to millions of times with fresh parameters, so the
/// statement must not be rebuilt per row. Session resources are released on
/// drop, on every exit path.
pub trait StorageHandle {
    /// Execute a parameterized statement and fetch every result row.
    fn fetch_all(&mut self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>>;

    /// Define a named, reusable parameterized statement. Redefining a live
    /// name is an error; [`deallocate`](StorageHandle::deallocate) first.
    fn prepare_named(&mut self, name: &str, sql: &str) -> Result<()>;

    /// Whether `name` is currently defined.
    fn has_prepared_statement(&self, name: &str) -> bool;

    /// Drop a previously defined named statement.
    fn deallocate(&mut self, name: &str) -> Result<()>;

    /// Execute a named statement with fresh parameters, fetching all rows.
    fn execute_prepared(&mut self, name: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_accessors() {
        assert_eq!(SqlValue::Integer(3).as_i64(), Some(3));
        assert_eq!(SqlValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(SqlValue::Real(1.5).as_f64(), Some(1.5));
        assert_eq!(SqlValue::Real(1.5).as_i64(), None);
        assert_eq!(SqlValue::Text("eta".into()).as_str(), Some("eta"));
        assert_eq!(SqlValue::Null.as_f64(), None);
    }

    #[test]
    fn field_decoding_reports_position() {
        let row: SqlRow = vec![SqlValue::Integer(7), SqlValue::Text("x".into())];
        assert_eq!(field_i64(&row, 0).unwrap(), 7);
        assert!(field_f64(&row, 1).is_err());
        assert!(field_i64(&row, 5).is_err());
    }
}
