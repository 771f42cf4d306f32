//! SQL expression operators.
//!
//! These structs represent compound expressions like `col = ?`, `col LIKE ?`, etc.
//! Each implements [`Expression`] and recursively builds SQL fragments.

use crate::{dialect::Dialect, traits::Expression, value::Value};

/// Represents a binary comparison (e.g., `=`, `>`, `<=`).
pub struct BinaryOp<L> {
    left: L,
    op: &'static str,
    right: Value,
}

impl<L> BinaryOp<L> {
    pub fn new(left: L, op: &'static str, right: Value) -> Self {
        Self {
            left,
            op,
            right,
        }
    }
}

impl<L: Expression> Expression for BinaryOp<L> {
    fn to_sql(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> String {
        let left_sql = self.left.to_sql(dialect, params);
        params.push(self.right.clone());
        format!("{} {} {}", left_sql, self.op, dialect.placeholder())
    }
}

/// Represents a `LIKE` pattern match. The pattern is bound verbatim.
pub struct LikeOp<L> {
    left: L,
    pattern: String,
}

impl<L> LikeOp<L> {
    pub const fn new(left: L, pattern: String) -> Self {
        Self {
            left,
            pattern,
        }
    }
}

impl<L: Expression> Expression for LikeOp<L> {
    fn to_sql(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> String {
        let left_sql = self.left.to_sql(dialect, params);
        params.push(Value::Text(self.pattern.clone()));
        format!("{} LIKE {}", left_sql, dialect.placeholder())
    }
}

/// Represents an `IN` clause.
pub struct InOp<L> {
    left: L,
    values: Vec<Value>,
}

impl<L> InOp<L> {
    pub fn new(left: L, values: Vec<Value>) -> Self {
        Self {
            left,
            values,
        }
    }
}

impl<L: Expression> Expression for InOp<L> {
    fn to_sql(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> String {
        // `x IN ()` is a syntax error in both dialects
        if self.values.is_empty() {
            return "1 = 0".to_string();
        }

        let left_sql = self.left.to_sql(dialect, params);
        let placeholders = vec![dialect.placeholder(); self.values.len()].join(", ");
        params.extend(self.values.iter().cloned());
        format!("{} IN ({})", left_sql, placeholders)
    }
}

/// Represents an `IS NULL` or `IS NOT NULL` check.
pub struct NullOp<L> {
    left: L,
    is_null: bool,
}

impl<L> NullOp<L> {
    pub fn new(left: L, is_null: bool) -> Self {
        Self {
            left,
            is_null,
        }
    }
}

impl<L: Expression> Expression for NullOp<L> {
    fn to_sql(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> String {
        let left_sql = self.left.to_sql(dialect, params);
        let op = if self.is_null {
            "IS NULL"
        } else {
            "IS NOT NULL"
        };
        format!("{} {}", left_sql, op)
    }
}

/// Joins any number of expressions with `AND` or `OR`, parenthesised as a whole.
///
/// With no operands it renders the operator's identity: `1 = 1` for `AND`,
/// `1 = 0` for `OR`.
pub struct LogicalOp {
    operands: Vec<Box<dyn Expression>>,
    op: &'static str,
}

impl LogicalOp {
    pub fn and(operands: Vec<Box<dyn Expression>>) -> Self {
        Self {
            operands,
            op: "AND",
        }
    }

    pub fn or(operands: Vec<Box<dyn Expression>>) -> Self {
        Self {
            operands,
            op: "OR",
        }
    }
}

impl Expression for LogicalOp {
    fn to_sql(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> String {
        if self.operands.is_empty() {
            let identity = if self.op == "AND" { "1 = 1" } else { "1 = 0" };
            return identity.to_string();
        }

        let parts = self
            .operands
            .iter()
            .map(|operand| operand.to_sql(dialect, params))
            .collect::<Vec<_>>();
        format!("({})", parts.join(&format!(" {} ", self.op)))
    }
}

/// Two predicates that must both hold, rendered as `(left) AND (right)`.
///
/// This is the node behind [`crate::query::Filter::and`].
pub struct Conjunction<L, R> {
    left: L,
    right: R,
}

impl<L, R> Conjunction<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self {
            left,
            right,
        }
    }
}

impl<L: Expression, R: Expression> Expression for Conjunction<L, R> {
    fn to_sql(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> String {
        let left_sql = self.left.to_sql(dialect, params);
        let right_sql = self.right.to_sql(dialect, params);
        format!("({}) AND ({})", left_sql, right_sql)
    }
}

/// Wraps an expression in parentheses.
pub struct Grouped<E>(pub E);

impl<E: Expression> Expression for Grouped<E> {
    fn to_sql(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> String {
        format!("({})", self.0.to_sql(dialect, params))
    }
}

/// Whole days from today until a date, spelled per dialect.
pub struct DaysFromToday<E> {
    inner: E,
}

impl<E> DaysFromToday<E> {
    pub fn new(inner: E) -> Self {
        Self {
            inner,
        }
    }
}

impl<E: Expression> Expression for DaysFromToday<E> {
    fn to_sql(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> String {
        let inner_sql = self.inner.to_sql(dialect, params);
        dialect.days_from_today(&inner_sql)
    }
}

/// A searched `CASE WHEN … THEN … ELSE … END` expression.
pub struct CaseOp {
    branches: Vec<(Box<dyn Expression>, Box<dyn Expression>)>,
    otherwise: Box<dyn Expression>,
}

impl CaseOp {
    pub fn new(otherwise: impl Expression + 'static) -> Self {
        Self {
            branches: vec![],
            otherwise: Box::new(otherwise),
        }
    }

    /// Adds a `WHEN condition THEN result` branch after the existing ones.
    pub fn when(
        mut self,
        condition: impl Expression + 'static,
        result: impl Expression + 'static,
    ) -> Self {
        self.branches.push((Box::new(condition), Box::new(result)));
        self
    }
}

impl Expression for CaseOp {
    fn to_sql(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> String {
        let mut sql = String::from("CASE");
        for (condition, result) in &self.branches {
            let condition = condition.to_sql(dialect, params);
            let result = result.to_sql(dialect, params);
            sql.push_str(&format!(" WHEN {} THEN {}", condition, result));
        }
        let otherwise = self.otherwise.to_sql(dialect, params);
        sql.push_str(&format!(" ELSE {} END", otherwise));
        sql
    }
}
