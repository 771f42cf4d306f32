//! Leaf expressions: column references and trusted SQL text.

use std::borrow::Cow;

use crate::{dialect::Dialect, traits::Expression, value::Value};

/// A reference to a database column, optionally table-qualified.
///
/// # Example
///
/// ```rust
/// use secconf_db::expr::Col;
/// const START_DATE: Col = Col::new("startDate");
/// ```
#[derive(Debug, Clone)]
pub struct Col {
    pub name: Cow<'static, str>,
}

impl Col {
    /// Creates a new column reference.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
        }
    }

    /// Creates a column reference from a runtime name.
    ///
    /// The name is written into the statement verbatim, so callers must
    /// validate it first (see [`crate::helpers::validate_identifier`]).
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
        }
    }
}

impl Expression for Col {
    fn to_sql(&self, _dialect: &dyn Dialect, _params: &mut Vec<Value>) -> String {
        self.name.to_string()
    }
}

/// SQL text that is part of the program, never built from user input.
///
/// Used for fixed fragments such as correlated sub-selects that the
/// expression tree has no node for.
#[derive(Debug, Clone)]
pub struct Raw(pub Cow<'static, str>);

impl Raw {
    pub const fn new(sql: &'static str) -> Self {
        Self(Cow::Borrowed(sql))
    }
}

impl Expression for Raw {
    fn to_sql(&self, _dialect: &dyn Dialect, _params: &mut Vec<Value>) -> String {
        self.0.trim().to_string()
    }
}
