//! Error types for secconf-db.

use miette::Diagnostic;
use thiserror::Error;

use crate::store::StoreError;

/// Database error type for secconf-db operations.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Unauthorized access: {message}")]
    #[diagnostic(
        code(secconf_db::unauthorized),
        help("Check the database credentials and the privileges granted to that user")
    )]
    Unauthorized { code: Option<i32>, message: String },

    #[error("{message}")]
    #[diagnostic(code(secconf_db::store))]
    Store { code: Option<i32>, message: String },

    #[error("Database connection failed: {0}")]
    #[diagnostic(
        code(secconf_db::connection),
        help("Check the database host, name and backend in your configuration")
    )]
    Connection(String),

    #[error("Row has {found} values but the projection names {expected} columns")]
    #[diagnostic(
        code(secconf_db::shape_mismatch),
        help("The projection and the result set disagree, this is a bug in the query")
    )]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Two result columns would both be named `{0}`")]
    #[diagnostic(
        code(secconf_db::duplicate_field),
        help("Give one of the columns an alias with `AS`")
    )]
    DuplicateField(String),

    #[error("{0} clause must not be empty")]
    #[diagnostic(code(secconf_db::empty_clause))]
    EmptyClause(&'static str),

    #[error("Missing field `{0}` in record")]
    #[diagnostic(code(secconf_db::missing_field))]
    MissingField(String),

    #[error("Field `{field}` holds {found}, expected {expected}")]
    #[diagnostic(code(secconf_db::field_type))]
    FieldType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid identifier: {0}")]
    #[diagnostic(
        code(secconf_db::invalid_identifier),
        help("Table and column names may only contain letters, digits and underscores")
    )]
    InvalidIdentifier(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(secconf_db::not_found))]
    NotFound(String),
}

impl DbError {
    /// Translates a raw store failure, recognising the store's access-denied codes.
    ///
    /// Everything not listed in `denied_codes` is passed through with its
    /// original code and message.
    pub fn from_store(err: StoreError, denied_codes: &[i32]) -> Self {
        match err.code {
            Some(code) if denied_codes.contains(&code) => {
                DbError::Unauthorized {
                    code: err.code,
                    message: err.message,
                }
            }
            _ => {
                DbError::Store {
                    code: err.code,
                    message: err.message,
                }
            }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DbError::Unauthorized { .. })
    }
}

/// Result type alias for secconf-db operations.
pub type Result<T> = std::result::Result<T, DbError>;
