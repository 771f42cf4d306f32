use tracing::{debug, warn};

use crate::{
    dialect::Dialect,
    error::{DbError, Result},
    helpers::validate_identifier,
    store::Store,
    value::Value,
};

/// `INSERT INTO <table> (...) VALUES (...)` for a single row.
#[derive(Debug)]
pub struct InsertQuery {
    table: String,
    values: Vec<(String, Value)>,
}

impl InsertQuery {
    pub fn table(table: &str) -> Result<Self> {
        Ok(Self {
            table: validate_identifier(table)?.to_string(),
            values: vec![],
        })
    }

    pub fn value(mut self, column: &str, value: impl Into<Value>) -> Result<Self> {
        let column = validate_identifier(column)?;
        self.values.push((column.to_string(), value.into()));
        Ok(self)
    }

    pub fn build(&self, dialect: &dyn Dialect) -> Result<(String, Vec<Value>)> {
        if self.values.is_empty() {
            return Err(DbError::EmptyClause("VALUES"));
        }

        let (columns, params): (Vec<&str>, Vec<Value>) = self
            .values
            .iter()
            .map(|(col, val)| (col.as_str(), val.clone()))
            .unzip();
        let placeholders = vec![dialect.placeholder(); columns.len()].join(", ");

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders
        );
        Ok((sql, params))
    }

    /// Inserts the row and returns the number of affected rows.
    pub fn execute<S: Store + ?Sized>(&self, store: &mut S) -> Result<u64> {
        let (sql, params) = self.build(store.dialect())?;
        debug!(sql = sql.as_str(), params = params.len(), "executing insert");

        let denied_codes = store.denied_codes();
        store.execute(&sql, &params).map_err(|err| {
            let err = DbError::from_store(err, denied_codes);
            if err.is_unauthorized() {
                warn!(table = self.table.as_str(), "insert rejected by the database: {err}");
            }
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dialect::MySql, store::SqliteStore};

    #[test]
    fn test_build() {
        let (sql, params) = InsertQuery::table("Tags")
            .unwrap()
            .value("tag", 9)
            .unwrap()
            .value("name", "privacy")
            .unwrap()
            .build(&MySql)
            .unwrap();

        assert_eq!(sql, "INSERT INTO Tags (tag, name) VALUES (?, ?)");
        assert_eq!(params, vec![Value::Integer(9), Value::from("privacy")]);
    }

    #[test]
    fn test_build_without_values() {
        let err = InsertQuery::table("Tags").unwrap().build(&MySql).unwrap_err();
        assert!(matches!(err, DbError::EmptyClause("VALUES")));
    }

    #[test]
    fn test_execute() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .connection()
            .execute("CREATE TABLE Tags (tag INTEGER PRIMARY KEY, name TEXT)", [])
            .unwrap();

        let inserted = InsertQuery::table("Tags")
            .unwrap()
            .value("name", "privacy")
            .unwrap()
            .execute(&mut store)
            .unwrap();
        assert_eq!(inserted, 1);

        let name: String = store
            .connection()
            .query_row("SELECT name FROM Tags", [], |row| row.get(0))
            .unwrap();
        assert_eq!(name, "privacy");
    }
}
