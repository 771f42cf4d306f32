//! Statement clauses and their composition.
//!
//! Every clause renders to a [`Fragment`]: `"<KEYWORD> <body>"` when it has a
//! body, or an empty fragment when it does not. Empty fragments are the
//! identity of `+`, so a statement is just the sum of its clauses and absent
//! clauses leave no trace in the SQL text.

use std::{
    borrow::Cow,
    collections::BTreeSet,
    fmt,
    ops::{Add, BitAnd},
    sync::{Arc, LazyLock},
};

use regex::Regex;

use crate::{
    dialect::{Dialect, MySql},
    error::{DbError, Result},
    expr::{CaseOp, Col, Conjunction, LogicalOp, Raw},
    helpers::validate_identifier,
    record::check_names,
    traits::Expression,
    value::Value,
};

/// A rendered piece of a statement together with the values it binds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Fragment {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl From<&str> for Fragment {
    fn from(sql: &str) -> Self {
        Fragment::new(sql, vec![])
    }
}

impl From<String> for Fragment {
    fn from(sql: String) -> Self {
        Fragment::new(sql, vec![])
    }
}

impl Add for Fragment {
    type Output = Fragment;

    fn add(mut self, rhs: Fragment) -> Fragment {
        if self.is_empty() {
            return rhs;
        }
        if rhs.is_empty() {
            return self;
        }

        self.sql.push(' ');
        self.sql.push_str(&rhs.sql);
        self.params.extend(rhs.params);
        self
    }
}

impl Add<&str> for Fragment {
    type Output = Fragment;

    fn add(self, rhs: &str) -> Fragment {
        self + Fragment::from(rhs)
    }
}

impl Add<Fragment> for &str {
    type Output = Fragment;

    fn add(self, rhs: Fragment) -> Fragment {
        Fragment::from(self) + rhs
    }
}

/// A keyword-led part of a statement whose body may be absent.
pub trait Clause {
    const KEYWORD: &'static str;

    /// Renders the body, pushing bound values to `params`, or `None` when absent.
    fn body(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> Option<String>;

    fn render(&self, dialect: &dyn Dialect) -> Fragment {
        let mut params = vec![];
        match self.body(dialect, &mut params) {
            Some(body) => Fragment::new(format!("{} {}", Self::KEYWORD, body), params),
            None => Fragment::default(),
        }
    }
}

static ALIAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^.*\s+AS\s+([A-Za-z_][A-Za-z0-9_]*)\s*$").unwrap());

/// The field name a projected column lands in.
///
/// `"<expr> AS <alias>"` yields the alias; otherwise any `"<table>."`
/// qualifier is stripped from the column token.
pub fn destination_name(column: &str) -> String {
    if let Some(captures) = ALIAS.captures(column) {
        return captures[1].to_string();
    }

    let column = column.trim();
    match column.rsplit_once('.') {
        Some((_, name)) => name.to_string(),
        None => column.to_string(),
    }
}

/// The `SELECT` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    columns: Vec<Cow<'static, str>>,
}

impl Projection {
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        let columns: Vec<_> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(DbError::EmptyClause("SELECT"));
        }

        let projection = Self {
            columns,
        };
        if !projection.is_wildcard() {
            check_names(&projection.names())?;
        }
        Ok(projection)
    }

    fn fixed(columns: Vec<Cow<'static, str>>) -> Self {
        Self {
            columns,
        }
    }

    /// `SELECT *`; field names come from the store's result columns.
    pub fn all() -> Self {
        Self::fixed(vec![Cow::Borrowed("*")])
    }

    pub fn is_wildcard(&self) -> bool {
        self.columns.len() == 1 && self.columns[0] == "*"
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.as_ref())
    }

    /// Destination field names, one per column, in projection order.
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| destination_name(c)).collect()
    }

    pub fn events() -> Self {
        Self::fixed(
            [
                "url",
                "conference",
                "abbreviation",
                "Conferences.name AS name",
                "startDate",
                "endDate",
                "deadline",
                "extendedDeadline",
                "posterDeadline",
                "Locations.name AS location",
                "Regions.name AS region",
                "Regions.code AS regionCode",
                "Countries.code AS country",
                "proceedings",
                "Conferences.permanentURL AS permanentURL",
            ]
            .into_iter()
            .map(Cow::Borrowed)
            .collect(),
        )
    }

    pub fn conference() -> Self {
        Self::fixed(
            [
                "conference",
                "parent",
                "name",
                "abbreviation",
                "description",
                "permanentURL AS url",
                "tags",
            ]
            .into_iter()
            .map(Cow::Borrowed)
            .collect(),
        )
    }

    pub fn locations() -> Self {
        Self::fixed(
            [
                "location",
                "Locations.name AS name",
                "Regions.name AS region",
                "Countries.name AS country",
            ]
            .into_iter()
            .map(Cow::Borrowed)
            .collect(),
        )
    }

    pub fn meeting_types() -> Self {
        Self::fixed(
            ["meetingType", "name"]
                .into_iter()
                .map(Cow::Borrowed)
                .collect(),
        )
    }

    pub fn tags() -> Self {
        Self::fixed(["tag", "name"].into_iter().map(Cow::Borrowed).collect())
    }
}

impl Clause for Projection {
    const KEYWORD: &'static str = "SELECT";

    fn body(&self, _dialect: &dyn Dialect, _params: &mut Vec<Value>) -> Option<String> {
        Some(self.columns.join(", "))
    }
}

const EVENTS_SOURCE: &str = "ConferenceInstances \
INNER JOIN Conferences USING (conference) \
INNER JOIN Locations USING (location) \
LEFT JOIN Regions USING (region) \
INNER JOIN Countries ON ((Locations.country = Countries.country) \
OR (Regions.country = Countries.country))";

const LOCATIONS_SOURCE: &str = "Locations \
LEFT JOIN Regions USING (region) \
INNER JOIN Countries ON ((Locations.country = Countries.country) \
OR (Regions.country = Countries.country))";

/// The `FROM` relation: a table name or a join expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    relation: Cow<'static, str>,
}

impl Source {
    /// A single table, named at runtime.
    pub fn table(name: &str) -> Result<Self> {
        let name = validate_identifier(name)?;
        Ok(Self {
            relation: Cow::Owned(name.to_string()),
        })
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub const fn events() -> Self {
        Self {
            relation: Cow::Borrowed(EVENTS_SOURCE),
        }
    }

    pub const fn conference() -> Self {
        Self {
            relation: Cow::Borrowed("Conferences"),
        }
    }

    pub const fn locations() -> Self {
        Self {
            relation: Cow::Borrowed(LOCATIONS_SOURCE),
        }
    }

    pub const fn meeting_types() -> Self {
        Self {
            relation: Cow::Borrowed("MeetingTypes"),
        }
    }

    pub const fn tags() -> Self {
        Self {
            relation: Cow::Borrowed("Tags"),
        }
    }
}

impl Clause for Source {
    const KEYWORD: &'static str = "FROM";

    fn body(&self, _dialect: &dyn Dialect, _params: &mut Vec<Value>) -> Option<String> {
        Some(self.relation.to_string())
    }
}

const START_DATE: Col = Col::new("startDate");
const DEADLINE: Col = Col::new("deadline");
const EXTENDED_DEADLINE: Col = Col::new("extendedDeadline");
const POSTER_DEADLINE: Col = Col::new("posterDeadline");
const TAGS: Col = Col::new("tags");

/// Days either side of today covered by the upcoming and recent listings.
const LISTING_WINDOW_DAYS: i64 = 180;
/// A deadline stays listed this many days after it passes.
const DEADLINE_GRACE_DAYS: i64 = 14;

/// The `WHERE` predicate. An absent filter places no constraint.
#[derive(Clone, Default)]
pub struct Filter {
    expr: Option<Arc<dyn Expression>>,
}

impl Filter {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(expr: impl Expression + 'static) -> Self {
        Self {
            expr: Some(Arc::new(expr)),
        }
    }

    /// A predicate written as SQL text in the program itself.
    pub fn raw(sql: &'static str) -> Self {
        Self::new(Raw::new(sql))
    }

    pub fn is_absent(&self) -> bool {
        self.expr.is_none()
    }

    /// Logical AND where an absent side counts as "always true".
    ///
    /// Absent operands are dropped rather than wrapped, so `none().and(x)`
    /// is `x` itself; two present operands render as `(a) AND (b)`.
    pub fn and(self, other: Filter) -> Filter {
        match (self.expr, other.expr) {
            (None, expr) | (expr, None) => {
                Filter {
                    expr,
                }
            }
            (Some(left), Some(right)) => Filter::new(Conjunction::new(left, right)),
        }
    }

    /// Matches rows whose comma-joined `tags` column holds any of `ids` as a
    /// whole token. No ids means no constraint.
    ///
    /// Each id is anchored on both sides by the start or end of the list or
    /// by a comma, so `1` never matches `"12"` or `"21,12"`.
    pub fn tags<I>(ids: I) -> Filter
    where
        I: IntoIterator<Item = i64>,
    {
        let ids: BTreeSet<i64> = ids.into_iter().collect();
        if ids.is_empty() {
            return Filter::none();
        }

        let mut operands: Vec<Box<dyn Expression>> = Vec::with_capacity(ids.len() * 4);
        for id in ids {
            operands.push(Box::new(TAGS.eq(id.to_string())));
            operands.push(Box::new(TAGS.like(format!("{id},%"))));
            operands.push(Box::new(TAGS.like(format!("%,{id},%"))));
            operands.push(Box::new(TAGS.like(format!("%,{id}"))));
        }
        Filter::new(LogicalOp::or(operands))
    }

    /// Events starting today or within the next 180 days.
    pub fn upcoming() -> Filter {
        Filter::new(LogicalOp::and(vec![
            Box::new(START_DATE.days_from_today().gte(0)),
            Box::new(START_DATE.days_from_today().lte(LISTING_WINDOW_DAYS)),
        ]))
    }

    /// Events that started within the last 180 days.
    pub fn recent() -> Filter {
        Filter::new(LogicalOp::and(vec![
            Box::new(START_DATE.days_from_today().lt(0)),
            Box::new(START_DATE.days_from_today().gte(-LISTING_WINDOW_DAYS)),
        ]))
    }

    /// Events with any deadline no more than two weeks past.
    pub fn upcoming_deadlines() -> Filter {
        Filter::new(LogicalOp::or(vec![
            Box::new(DEADLINE.days_from_today().gte(-DEADLINE_GRACE_DAYS)),
            Box::new(EXTENDED_DEADLINE.days_from_today().gte(-DEADLINE_GRACE_DAYS)),
            Box::new(POSTER_DEADLINE.days_from_today().gte(-DEADLINE_GRACE_DAYS)),
        ]))
    }

    /// The latest instance of every conference.
    pub fn most_recent_per_conference() -> Filter {
        Filter::raw(
            "startDate = (SELECT MAX(startDate) FROM ConferenceInstances AS ci \
             WHERE ci.conference = ConferenceInstances.conference)",
        )
    }

    pub fn conference_id(id: i64) -> Filter {
        Filter::new(Col::new("conference").eq(id))
    }

    pub fn abbreviation(abbreviation: &str) -> Filter {
        Filter::new(Col::new("abbreviation").eq(abbreviation))
    }

    /// `column = id` for a column named at runtime.
    pub fn key(column: &str, id: i64) -> Result<Filter> {
        let column = validate_identifier(column)?;
        Ok(Filter::new(Col::named(column).eq(id)))
    }

    pub fn tag_ids<I>(ids: I) -> Filter
    where
        I: IntoIterator<Item = i64>,
    {
        Filter::new(Col::new("tag").in_(ids))
    }

    pub fn tag_names<I, S>(names: I) -> Filter
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::new(Col::new("name").in_(names.into_iter().map(|name| Value::Text(name.into()))))
    }
}

impl BitAnd for Filter {
    type Output = Filter;

    fn bitand(self, rhs: Filter) -> Filter {
        self.and(rhs)
    }
}

impl Clause for Filter {
    const KEYWORD: &'static str = "WHERE";

    fn body(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> Option<String> {
        self.expr.as_ref().map(|expr| expr.to_sql(dialect, params))
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut params = vec![];
        f.debug_struct("Filter")
            .field("body", &self.body(&MySql, &mut params))
            .field("params", &params)
            .finish()
    }
}

#[derive(Clone)]
struct OrderTerm {
    expr: Arc<dyn Expression>,
    desc: bool,
}

/// The `ORDER BY` list. Without terms the store's own order applies.
#[derive(Clone, Default)]
pub struct Order {
    terms: Vec<OrderTerm>,
}

impl Order {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn by(expr: impl Expression + 'static) -> Self {
        Self::none().then(expr, false)
    }

    pub fn by_desc(expr: impl Expression + 'static) -> Self {
        Self::none().then(expr, true)
    }

    /// Appends a tie-breaking term.
    pub fn then(mut self, expr: impl Expression + 'static, desc: bool) -> Self {
        self.terms.push(OrderTerm {
            expr: Arc::new(expr),
            desc,
        });
        self
    }

    pub fn is_absent(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn start_date(reverse: bool) -> Self {
        if reverse {
            Self::by_desc(START_DATE)
        } else {
            Self::by(START_DATE)
        }
    }

    /// Orders by whichever deadline is still relevant: the poster deadline
    /// once both the paper and extended deadlines are more than two weeks
    /// gone, otherwise the extended deadline if there is one.
    pub fn deadline() -> Self {
        let expired = Conjunction::new(
            DEADLINE.days_from_today().lt(-DEADLINE_GRACE_DAYS),
            LogicalOp::or(vec![
                Box::new(EXTENDED_DEADLINE.null()),
                Box::new(EXTENDED_DEADLINE.days_from_today().lt(-DEADLINE_GRACE_DAYS)),
            ]),
        );

        Self::by(
            CaseOp::new(EXTENDED_DEADLINE)
                .when(expired, POSTER_DEADLINE)
                .when(EXTENDED_DEADLINE.null(), DEADLINE),
        )
    }

    pub fn locations() -> Self {
        Self::by(Col::new("Countries.name"))
            .then(Col::new("Regions.name"), false)
            .then(Col::new("Locations.name"), false)
    }
}

impl Clause for Order {
    const KEYWORD: &'static str = "ORDER BY";

    fn body(&self, dialect: &dyn Dialect, params: &mut Vec<Value>) -> Option<String> {
        if self.terms.is_empty() {
            return None;
        }

        let terms = self
            .terms
            .iter()
            .map(|term| {
                let sql = term.expr.to_sql(dialect, params);
                if term.desc {
                    format!("{sql} DESC")
                } else {
                    sql
                }
            })
            .collect::<Vec<_>>();
        Some(terms.join(", "))
    }
}

impl fmt::Debug for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut params = vec![];
        f.debug_struct("Order")
            .field("body", &self.body(&MySql, &mut params))
            .finish()
    }
}
