//! Read statements assembled from clauses.

use tracing::{debug, trace, warn};

use crate::{
    dialect::Dialect,
    error::{DbError, Result},
    query::clause::{Clause, Filter, Order, Projection, Source},
    record::{check_names, Record},
    store::Store,
    traits::FromRecord,
    value::Value,
};

/// A `SELECT` statement: projection, source, optional filter and order.
///
/// Without explicit clauses it lists conference events ordered by start date.
///
/// # Example
///
/// ```rust
/// use secconf_db::{dialect::MySql, query::{Filter, SelectQuery}};
///
/// let (sql, params) = SelectQuery::new()
///     .filter(Filter::conference_id(7))
///     .build(&MySql);
/// assert!(sql.starts_with("SELECT url, conference, abbreviation"));
/// assert!(sql.contains(" WHERE conference = ? ORDER BY startDate"));
/// assert_eq!(params.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SelectQuery {
    projection: Projection,
    source: Source,
    filter: Filter,
    order: Order,
}

impl Default for SelectQuery {
    fn default() -> Self {
        Self {
            projection: Projection::events(),
            source: Source::events(),
            filter: Filter::none(),
            order: Order::start_date(false),
        }
    }
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn from(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order_by(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Renders the statement and the values bound to its placeholders.
    pub fn build(&self, dialect: &dyn Dialect) -> (String, Vec<Value>) {
        let statement = self.projection.render(dialect)
            + self.source.render(dialect)
            + self.filter.render(dialect)
            + self.order.render(dialect);
        (statement.sql, statement.params)
    }

    /// Runs the statement and maps every row to a [`Record`].
    ///
    /// Field names come from the projection. A wildcard projection takes
    /// them from the result columns instead. Two columns landing on the same
    /// name, or the first row whose width differs from the projection, abort
    /// the whole call.
    pub fn execute<S: Store + ?Sized>(&self, store: &mut S) -> Result<Vec<Record>> {
        let (sql, params) = self.build(store.dialect());
        debug!(sql = sql.as_str(), params = params.len(), "executing select");
        trace!(?params, "bound parameters");

        let denied_codes = store.denied_codes();
        let rows = store.query(&sql, &params).map_err(|err| {
            let err = DbError::from_store(err, denied_codes);
            if err.is_unauthorized() {
                warn!("select rejected by the database: {err}");
            }
            err
        })?;

        let names = if self.projection.is_wildcard() {
            rows.columns
        } else {
            self.projection.names()
        };
        check_names(&names)?;

        let records = rows
            .rows
            .into_iter()
            .map(|row| Record::from_row(&names, row))
            .collect::<Result<Vec<_>>>()?;

        debug!(count = records.len(), "select returned records");
        Ok(records)
    }

    /// Runs the statement and converts each record with [`FromRecord`].
    pub fn fetch<T: FromRecord, S: Store + ?Sized>(&self, store: &mut S) -> Result<Vec<T>> {
        self.execute(store)?
            .iter()
            .map(T::from_record)
            .collect()
    }

    /// Like [`SelectQuery::fetch`] but keeps only the first result.
    pub fn fetch_one<T: FromRecord, S: Store + ?Sized>(&self, store: &mut S) -> Result<Option<T>> {
        self.execute(store)?
            .first()
            .map(T::from_record)
            .transpose()
    }
}
