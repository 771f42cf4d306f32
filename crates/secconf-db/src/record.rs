//! Result records.
//!
//! A [`Record`] is the untyped view of one result row: the projection's
//! destination names zipped with the row's values. Records are only built by
//! query execution and are read-only afterwards.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::{
    error::{DbError, Result},
    value::Value,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, Value>,
}

/// Fails on the first destination name that appears twice, since a record
/// can only hold one value per field.
pub(crate) fn check_names(names: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(names.len());
    match names.iter().find(|name| !seen.insert(name.as_str())) {
        Some(name) => Err(DbError::DuplicateField(name.clone())),
        None => Ok(()),
    }
}

impl Record {
    /// Zips destination names with one row's values, positionally.
    ///
    /// Fails with [`DbError::ShapeMismatch`] instead of truncating or padding
    /// when the widths differ.
    pub(crate) fn from_row(names: &[String], row: Vec<Value>) -> Result<Self> {
        if names.len() != row.len() {
            return Err(DbError::ShapeMismatch {
                expected: names.len(),
                found: row.len(),
            });
        }

        let fields = names.iter().cloned().zip(row).collect();
        Ok(Self {
            fields,
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn get(&self, field: &str) -> Result<&Value> {
        self.fields
            .get(field)
            .ok_or_else(|| DbError::MissingField(field.to_string()))
    }

    pub fn integer(&self, field: &str) -> Result<i64> {
        self.opt_integer(field)?
            .ok_or_else(|| type_error(field, "integer", &Value::Null))
    }

    pub fn opt_integer(&self, field: &str) -> Result<Option<i64>> {
        match self.get(field)? {
            Value::Null => Ok(None),
            Value::Integer(i) => Ok(Some(*i)),
            // MySQL hands DECIMAL and some computed columns back as text
            Value::Text(s) => {
                s.trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| type_error(field, "integer", &Value::Text(s.clone())))
            }
            other => Err(type_error(field, "integer", other)),
        }
    }

    pub fn text(&self, field: &str) -> Result<String> {
        self.opt_text(field)?
            .ok_or_else(|| type_error(field, "text", &Value::Null))
    }

    pub fn opt_text(&self, field: &str) -> Result<Option<String>> {
        match self.get(field)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.clone())),
            Value::Integer(i) => Ok(Some(i.to_string())),
            other => Err(type_error(field, "text", other)),
        }
    }

    pub fn date(&self, field: &str) -> Result<NaiveDate> {
        self.opt_date(field)?
            .ok_or_else(|| type_error(field, "date", &Value::Null))
    }

    /// Reads a date, accepting the `YYYY-MM-DD` text form SQLite stores.
    pub fn opt_date(&self, field: &str) -> Result<Option<NaiveDate>> {
        match self.get(field)? {
            Value::Null => Ok(None),
            Value::Date(d) => Ok(Some(*d)),
            Value::DateTime(dt) => Ok(Some(dt.date())),
            Value::Text(s) => {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .or_else(|_| {
                        NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S")
                            .map(|dt| dt.date())
                    })
                    .map(Some)
                    .map_err(|_| type_error(field, "date", &Value::Text(s.clone())))
            }
            other => Err(type_error(field, "date", other)),
        }
    }
}

fn type_error(field: &str, expected: &'static str, found: &Value) -> DbError {
    DbError::FieldType {
        field: field.to_string(),
        expected,
        found: found.kind(),
    }
}
