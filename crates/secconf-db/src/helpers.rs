use std::sync::LazyLock;

use regex::Regex;

use crate::error::{DbError, Result};

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Checks that a runtime table or column name is a plain identifier.
///
/// Identifiers cannot be bound as parameters, so anything that reaches the
/// statement text from outside the crate goes through here first.
pub fn validate_identifier(name: &str) -> Result<&str> {
    if IDENTIFIER.is_match(name) {
        Ok(name)
    } else {
        Err(DbError::InvalidIdentifier(name.to_string()))
    }
}

/// Parses a comma-joined tag list such as `"3,7,12"`, skipping blanks and
/// anything that is not a number.
pub fn parse_tag_ids(tags: &str) -> Vec<i64> {
    tags.split(',')
        .filter_map(|tag| tag.trim().parse().ok())
        .collect()
}
