//! SQLite backend.

use std::path::Path;

use rusqlite::{
    ffi,
    params_from_iter,
    types::{Value as SqliteValue, ValueRef},
    Connection, OpenFlags,
};
use tracing::debug;

use super::{Store, StoreError, StoreRows};
use crate::{
    dialect::{Dialect, Sqlite},
    value::Value,
};

/// SQLite result codes treated as authorization failures.
pub const SQLITE_DENIED_CODES: &[i32] = &[ffi::SQLITE_AUTH, ffi::SQLITE_PERM, ffi::SQLITE_READONLY];

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens a database file. Read-only stores reject every write with
    /// `SQLITE_READONLY`.
    pub fn open<P: AsRef<Path>>(path: P, read_only: bool) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let flags = if read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        debug!(path = %path.display(), read_only, "opening sqlite store");
        let conn = Connection::open_with_flags(path, flags).map_err(store_error)?;
        Ok(Self {
            conn,
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(store_error)?;
        Ok(Self {
            conn,
        })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
        }
    }

    /// Gets a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl Store for SqliteStore {
    fn dialect(&self) -> &dyn Dialect {
        &Sqlite
    }

    fn denied_codes(&self) -> &'static [i32] {
        SQLITE_DENIED_CODES
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<StoreRows, StoreError> {
        let mut stmt = self.conn.prepare(sql).map_err(store_error)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt
            .query(params_from_iter(params.iter().map(to_sqlite)))
            .map_err(store_error)?;

        let mut collected = Vec::new();
        while let Some(row) = rows.next().map_err(store_error)? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(from_sqlite(row.get_ref(idx).map_err(store_error)?));
            }
            collected.push(values);
        }

        Ok(StoreRows {
            columns,
            rows: collected,
        })
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64, StoreError> {
        let affected = self
            .conn
            .execute(sql, params_from_iter(params.iter().map(to_sqlite)))
            .map_err(store_error)?;
        Ok(affected as u64)
    }
}

fn to_sqlite(value: &Value) -> SqliteValue {
    match value {
        Value::Null => SqliteValue::Null,
        Value::Integer(i) => SqliteValue::Integer(*i),
        Value::Real(r) => SqliteValue::Real(*r),
        Value::Text(s) => SqliteValue::Text(s.clone()),
        Value::Date(_) | Value::DateTime(_) => SqliteValue::Text(value.to_string()),
    }
}

fn from_sqlite(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) | ValueRef::Blob(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
    }
}

/// Keeps the primary result code, which is what the denied list is keyed on.
///
/// Prepare-time failures arrive as `SqlInputError` rather than
/// `SqliteFailure`; both carry the engine's code.
fn store_error(err: rusqlite::Error) -> StoreError {
    let code = match &err {
        rusqlite::Error::SqliteFailure(failure, _)
        | rusqlite::Error::SqlInputError {
            error: failure, ..
        } => Some(failure.extended_code & 0xff),
        _ => None,
    };
    StoreError::new(code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .connection()
            .execute_batch(
                "CREATE TABLE Tags (tag INTEGER PRIMARY KEY, name TEXT NOT NULL);
                 INSERT INTO Tags VALUES (1, 'crypto'), (2, 'systems');",
            )
            .unwrap();
        store
    }

    #[test]
    fn test_query_collects_rows_and_columns() {
        let mut store = store();
        let rows = store
            .query(
                "SELECT tag, name FROM Tags WHERE tag >= ? ORDER BY tag",
                &[Value::Integer(1)],
            )
            .unwrap();

        assert_eq!(rows.columns, vec!["tag", "name"]);
        assert_eq!(
            rows.rows,
            vec![
                vec![Value::Integer(1), Value::from("crypto")],
                vec![Value::Integer(2), Value::from("systems")],
            ]
        );
    }

    #[test]
    fn test_syntax_error_keeps_code_and_message() {
        let mut store = store();
        let err = store.query("SELEC nonsense", &[]).unwrap_err();

        assert_eq!(err.code, Some(ffi::SQLITE_ERROR));
        assert!(err.message.contains("syntax error"));
    }

    #[test]
    fn test_prepare_errors_keep_code() {
        let mut store = store();

        let err = store.query("SELECT missing FROM Tags", &[]).unwrap_err();
        assert_eq!(err.code, Some(ffi::SQLITE_ERROR));
        assert!(err.message.contains("no such column"));

        let err = store
            .execute("UPDATE Tags SET name = ? WHERE", &[Value::from("web")])
            .unwrap_err();
        assert_eq!(err.code, Some(ffi::SQLITE_ERROR));
    }

    #[test]
    fn test_query_only_rejects_writes_as_readonly() {
        let mut store = store();
        store
            .connection()
            .execute_batch("PRAGMA query_only = ON;")
            .unwrap();

        let err = store
            .execute("UPDATE Tags SET name = ? WHERE tag = ?", &[
                Value::from("web"),
                Value::Integer(1),
            ])
            .unwrap_err();
        assert_eq!(err.code, Some(ffi::SQLITE_READONLY));
        assert!(SQLITE_DENIED_CODES.contains(&ffi::SQLITE_READONLY));
    }

    #[test]
    fn test_dates_bind_as_iso_text() {
        let mut store = store();
        let date = chrono::NaiveDate::from_ymd_opt(2026, 2, 23).unwrap();
        let rows = store.query("SELECT ?", &[Value::Date(date)]).unwrap();
        assert_eq!(rows.rows[0][0], Value::from("2026-02-23"));
    }
}
