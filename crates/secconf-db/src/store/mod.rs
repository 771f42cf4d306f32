//! The store boundary.
//!
//! A [`Store`] takes a complete statement with its bound parameters and hands
//! back every result row at once. Backends keep the store's own numeric error
//! code in [`StoreError`] so that [`crate::error::DbError::from_store`] can tell
//! authorization failures apart from everything else.

pub mod mysql;
pub mod sqlite;

use std::fmt;

use crate::{dialect::Dialect, value::Value};

pub use mysql::MySqlStore;
pub use sqlite::SqliteStore;

/// A failure reported by the underlying store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreError {
    /// The store-specific error number, when the store reported one.
    pub code: Option<i32>,
    pub message: String,
}

impl StoreError {
    pub fn new(code: Option<i32>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "({code}) {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for StoreError {}

/// A fully materialised result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreRows {
    /// Column labels as reported by the store.
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

pub trait Store {
    /// The dialect statements for this store must be rendered in.
    fn dialect(&self) -> &dyn Dialect;

    /// Error codes this store uses for access-denied, bad-credential and
    /// command-denied conditions.
    fn denied_codes(&self) -> &'static [i32];

    /// Runs a statement and collects every row it returns.
    fn query(&mut self, sql: &str, params: &[Value]) -> Result<StoreRows, StoreError>;

    /// Runs a write statement, returning the number of affected rows.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64, StoreError>;
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn dialect(&self) -> &dyn Dialect {
        (**self).dialect()
    }

    fn denied_codes(&self) -> &'static [i32] {
        (**self).denied_codes()
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<StoreRows, StoreError> {
        (**self).query(sql, params)
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64, StoreError> {
        (**self).execute(sql, params)
    }
}

impl<S: Store + ?Sized> Store for &mut S {
    fn dialect(&self) -> &dyn Dialect {
        (**self).dialect()
    }

    fn denied_codes(&self) -> &'static [i32] {
        (**self).denied_codes()
    }

    fn query(&mut self, sql: &str, params: &[Value]) -> Result<StoreRows, StoreError> {
        (**self).query(sql, params)
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64, StoreError> {
        (**self).execute(sql, params)
    }
}
