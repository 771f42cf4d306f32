use std::{
    fmt::Display,
    sync::{LazyLock, RwLock},
};

use nu_ansi_term::Color;
use secconf_db::Value;

pub static COLOR: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let color = COLOR.read().unwrap();
        if *color {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

pub fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Parses `column=value`. Integers bind as integers, an empty value as NULL,
/// anything else as text.
pub fn parse_assignment(arg: &str) -> Result<(String, Value), String> {
    let (column, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected `column=value`, got `{arg}`"))?;

    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in `{arg}`"));
    }

    let value = if value.is_empty() {
        Value::Null
    } else if let Ok(int) = value.parse::<i64>() {
        Value::Integer(int)
    } else {
        Value::Text(value.to_string())
    };

    Ok((column.to_string(), value))
}

/// Parses `column=id` for selecting the row to update.
pub fn parse_key(arg: &str) -> Result<(String, i64), String> {
    match parse_assignment(arg)? {
        (column, Value::Integer(id)) => Ok((column, id)),
        _ => Err(format!("expected `column=<integer id>`, got `{arg}`")),
    }
}

pub fn or_dash<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
