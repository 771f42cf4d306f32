//! SQL dialect differences between the supported stores.
//!
//! Only the handful of constructs the canned filters need differ: both MySQL
//! and SQLite accept `?` placeholders and the same join syntax, but date
//! arithmetic relative to today is spelled differently.

pub trait Dialect: Send + Sync {
    /// Returns the name of the dialect (e.g. "MySQL").
    fn name(&self) -> &'static str;

    /// Returns the placeholder for a bound parameter.
    fn placeholder(&self) -> &'static str {
        "?"
    }

    /// Renders the whole number of days from today until the date in `expr`.
    ///
    /// Negative for dates in the past, NULL when `expr` is NULL.
    fn days_from_today(&self, expr: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn days_from_today(&self, expr: &str) -> String {
        format!("DATEDIFF({expr}, CURDATE())")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn days_from_today(&self, expr: &str) -> String {
        format!("CAST(julianday({expr}) - julianday(date('now')) AS INTEGER)")
    }
}
