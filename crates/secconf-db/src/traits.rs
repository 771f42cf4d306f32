//! Core traits that power the query builder.
//!
//! These traits define the contract for:
//! - Building SQL expressions with bound parameters (`Expression`)
//! - Converting result records into typed models (`FromRecord`)

use std::sync::Arc;

use crate::{
    dialect::Dialect,
    error::Result,
    expr::ops::{BinaryOp, DaysFromToday, InOp, LikeOp, LogicalOp, NullOp},
    record::Record,
    value::Value,
};

/// A type that renders into a SQL expression fragment.
///
/// When `to_sql` is called, it appends bound parameters to the provided
/// `params` vector and returns the SQL fragment with placeholders in their
/// place. Values are never written into the SQL text itself.
///
/// # Example
///
/// ```rust
/// use secconf_db::{dialect::MySql, expr::Col, traits::Expression as _};
///
/// let expr = Col::new("abbreviation").eq("USENIX Security");
/// let mut params = vec![];
/// let sql = expr.to_sql(&MySql, &mut params);
/// assert_eq!(sql, "abbreviation = ?");
/// assert_eq!(params.len(), 1);
/// ```
pub trait Expression: Send + Sync {
    /// Converts this expression into a SQL fragment and appends bound parameters.
    fn to_sql(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> String;

    /// Creates a SQL `=` condition.
    fn eq<T: Into<Value>>(self, value: T) -> BinaryOp<Self>
    where
        Self: Sized,
    {
        BinaryOp::new(self, "=", value.into())
    }

    /// Creates a SQL `!=` condition.
    fn ne<T: Into<Value>>(self, value: T) -> BinaryOp<Self>
    where
        Self: Sized,
    {
        BinaryOp::new(self, "!=", value.into())
    }

    /// Creates a SQL `>` condition.
    fn gt<T: Into<Value>>(self, value: T) -> BinaryOp<Self>
    where
        Self: Sized,
    {
        BinaryOp::new(self, ">", value.into())
    }

    /// Creates a SQL `<` condition.
    fn lt<T: Into<Value>>(self, value: T) -> BinaryOp<Self>
    where
        Self: Sized,
    {
        BinaryOp::new(self, "<", value.into())
    }

    /// Creates a SQL `>=` condition.
    fn gte<T: Into<Value>>(self, value: T) -> BinaryOp<Self>
    where
        Self: Sized,
    {
        BinaryOp::new(self, ">=", value.into())
    }

    /// Creates a SQL `<=` condition.
    fn lte<T: Into<Value>>(self, value: T) -> BinaryOp<Self>
    where
        Self: Sized,
    {
        BinaryOp::new(self, "<=", value.into())
    }

    /// Creates a SQL `LIKE` condition; `pattern` is bound as given.
    fn like(self, pattern: impl Into<String>) -> LikeOp<Self>
    where
        Self: Sized,
    {
        LikeOp::new(self, pattern.into())
    }

    /// Creates a SQL `IN` condition.
    fn in_<T, I>(self, values: I) -> InOp<Self>
    where
        Self: Sized,
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        let values = values.into_iter().map(|v| v.into()).collect();
        InOp::new(self, values)
    }

    /// Creates a SQL `IS NULL` condition.
    fn null(self) -> NullOp<Self>
    where
        Self: Sized,
    {
        NullOp::new(self, true)
    }

    /// Creates a SQL `IS NOT NULL` condition.
    fn not_null(self) -> NullOp<Self>
    where
        Self: Sized,
    {
        NullOp::new(self, false)
    }

    /// Combines two expressions with `OR`.
    fn or<E: Expression + 'static>(self, other: E) -> LogicalOp
    where
        Self: Sized + 'static,
    {
        LogicalOp::or(vec![Box::new(self), Box::new(other)])
    }

    /// Whole days from today until the date this expression evaluates to.
    fn days_from_today(self) -> DaysFromToday<Self>
    where
        Self: Sized,
    {
        DaysFromToday::new(self)
    }
}

impl<E: Expression + ?Sized> Expression for Box<E> {
    fn to_sql(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> String {
        (**self).to_sql(dialect, params)
    }
}

impl<E: Expression + ?Sized> Expression for Arc<E> {
    fn to_sql(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> String {
        (**self).to_sql(dialect, params)
    }
}

/// A trait for types that can be constructed from a result [`Record`].
///
/// This is used by [`crate::query::SelectQuery::fetch`] to map query results.
///
/// # Example
///
/// ```rust
/// use secconf_db::{error::Result, record::Record, FromRecord};
///
/// struct Tag {
///     id: i64,
///     name: String,
/// }
///
/// impl FromRecord for Tag {
///     fn from_record(record: &Record) -> Result<Self> {
///         Ok(Tag {
///             id: record.integer("tag")?,
///             name: record.text("name")?,
///         })
///     }
/// }
/// ```
pub trait FromRecord: Sized {
    fn from_record(record: &Record) -> Result<Self>;
}

impl FromRecord for Record {
    fn from_record(record: &Record) -> Result<Self> {
        Ok(record.clone())
    }
}
