use tracing::{debug, warn};

use crate::{
    dialect::Dialect,
    error::{DbError, Result},
    helpers::validate_identifier,
    query::clause::{Clause, Filter, Fragment},
    store::Store,
    value::Value,
};

/// `UPDATE <table> SET ... [WHERE ...]` over runtime-named columns.
#[derive(Debug)]
pub struct UpdateQuery {
    table: String,
    updates: Vec<(String, Value)>,
    filter: Filter,
}

impl UpdateQuery {
    pub fn table(table: &str) -> Result<Self> {
        Ok(Self {
            table: validate_identifier(table)?.to_string(),
            updates: vec![],
            filter: Filter::none(),
        })
    }

    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Result<Self> {
        let column = validate_identifier(column)?;
        self.updates.push((column.to_string(), value.into()));
        Ok(self)
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn build(&self, dialect: &dyn Dialect) -> Result<(String, Vec<Value>)> {
        if self.updates.is_empty() {
            return Err(DbError::EmptyClause("SET"));
        }

        let mut params = Vec::new();
        let sets: Vec<String> = self
            .updates
            .iter()
            .map(|(col, val)| {
                params.push(val.clone());
                format!("{} = {}", col, dialect.placeholder())
            })
            .collect();

        let statement = Fragment::new(
            format!("UPDATE {} SET {}", self.table, sets.join(", ")),
            params,
        ) + self.filter.render(dialect);

        Ok((statement.sql, statement.params))
    }

    /// Runs the update and returns the number of affected rows.
    pub fn execute<S: Store + ?Sized>(&self, store: &mut S) -> Result<u64> {
        let (sql, params) = self.build(store.dialect())?;
        debug!(sql = sql.as_str(), params = params.len(), "executing update");

        let denied_codes = store.denied_codes();
        store.execute(&sql, &params).map_err(|err| {
            let err = DbError::from_store(err, denied_codes);
            if err.is_unauthorized() {
                warn!(table = self.table.as_str(), "update rejected by the database: {err}");
            }
            err
        })
    }
}
