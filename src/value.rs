//! Typed row values and SQL literal rendering
//!
//! All value-to-text decisions for generated statements live in
//! [`format_sql_value`]. Everything else (builder, handler, stores) passes
//! values through untouched, so quoting and escaping behavior has exactly
//! one home.

use crate::schema::{ColumnDefinition, ColumnType};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A single typed cell value destined for a table column.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit absence, rendered as unquoted `null`
    Null,
    /// Text, single-quoted and escaped
    String(String),
    /// Signed integer, rendered bare
    Integer(i64),
    /// Float, rendered bare
    Float(f64),
    /// Boolean, rendered bare as `true`/`false`
    Bool(bool),
    /// UTC timestamp, rendered as `'YYYY-MM-DD HH:MM:SS'`
    Datetime(DateTime<Utc>),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Datetime(t)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// One row of cell values keyed by column name.
///
/// Sparse by design: a missing key formats the same as an explicit
/// [`Value::Null`].
pub type Row = BTreeMap<String, Value>;

/// Escape a string for embedding in a single-quoted SQL literal.
///
/// Backslash-escapes backslash, single quote, double quote, and NUL.
fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out
}

/// Render one cell as SQL literal text for its declared column type.
///
/// A missing value (`None`), an explicit [`Value::Null`], and an empty
/// string all render as unquoted `null` regardless of the column type.
/// Past that, the column type decides the shape. String columns quote and
/// escape the value's text rendering. Datetime columns re-render a
/// datetime value in the fixed `YYYY-MM-DD HH:MM:SS` form, and numeric or
/// boolean columns emit numbers and booleans bare.
///
/// A value the column type cannot absorb (text in a numeric column, a
/// non-datetime in a datetime column) is a formatting error; the wrong
/// literal never reaches the store.
pub fn format_sql_value(column: &ColumnDefinition, value: Option<&Value>) -> Result<String> {
    let value = match value {
        None | Some(Value::Null) => return Ok("null".to_string()),
        Some(v) => v,
    };

    if let Value::String(s) = value {
        if s.is_empty() {
            return Ok("null".to_string());
        }
    }

    match column.column_type {
        ColumnType::String => {
            let text = match value {
                Value::String(s) => escape_string(s),
                Value::Integer(n) => n.to_string(),
                Value::Float(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Datetime(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
                Value::Null => return Ok("null".to_string()),
            };
            Ok(format!("'{}'", text))
        }
        ColumnType::Datetime => match value {
            Value::Datetime(t) => Ok(format!("'{}'", t.format("%Y-%m-%d %H:%M:%S"))),
            other => Err(type_mismatch(column, other)),
        },
        ColumnType::Integer | ColumnType::Float | ColumnType::Boolean => match value {
            Value::Integer(n) => Ok(n.to_string()),
            Value::Float(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(type_mismatch(column, other)),
        },
    }
}

fn type_mismatch(column: &ColumnDefinition, value: &Value) -> Error {
    let variant = match value {
        Value::Null => "null",
        Value::String(_) => "a string",
        Value::Integer(_) => "an integer",
        Value::Float(_) => "a float",
        Value::Bool(_) => "a boolean",
        Value::Datetime(_) => "a datetime",
    };
    Error::Formatting(format!(
        "Column {} is declared {} but the value is {}",
        column.name, column.column_type, variant
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDefinition, ColumnType};
    use chrono::TimeZone;

    fn column(column_type: ColumnType) -> ColumnDefinition {
        ColumnDefinition::new("c", column_type, true)
    }

    #[test]
    fn test_option_converts_to_null_or_value() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(5i64)), Value::Integer(5));
        assert_eq!(Value::from(Some("s")), Value::String("s".to_string()));
    }

    #[test]
    fn test_missing_and_null_render_as_null() {
        let col = column(ColumnType::Integer);
        assert_eq!(format_sql_value(&col, None).unwrap(), "null");
        assert_eq!(format_sql_value(&col, Some(&Value::Null)).unwrap(), "null");
    }

    #[test]
    fn test_empty_string_renders_as_null_for_any_type() {
        for column_type in ColumnType::all() {
            let col = column(*column_type);
            let out = format_sql_value(&col, Some(&Value::String(String::new()))).unwrap();
            assert_eq!(out, "null");
        }
    }

    #[test]
    fn test_string_is_quoted_and_escaped() {
        let col = column(ColumnType::String);
        let value = Value::from("it's \"here\" \\ end");
        assert_eq!(
            format_sql_value(&col, Some(&value)).unwrap(),
            "'it\\'s \\\"here\\\" \\\\ end'"
        );
    }

    #[test]
    fn test_nul_byte_is_escaped() {
        let col = column(ColumnType::String);
        let value = Value::from("a\0b");
        assert_eq!(format_sql_value(&col, Some(&value)).unwrap(), "'a\\0b'");
    }

    #[test]
    fn test_scalars_render_bare() {
        let col = column(ColumnType::Integer);
        assert_eq!(format_sql_value(&col, Some(&Value::Integer(42))).unwrap(), "42");
        assert_eq!(format_sql_value(&col, Some(&Value::Integer(-7))).unwrap(), "-7");

        let col = column(ColumnType::Float);
        assert_eq!(format_sql_value(&col, Some(&Value::Float(1.5))).unwrap(), "1.5");

        let col = column(ColumnType::Boolean);
        assert_eq!(format_sql_value(&col, Some(&Value::Bool(true))).unwrap(), "true");
        assert_eq!(format_sql_value(&col, Some(&Value::Bool(false))).unwrap(), "false");
    }

    #[test]
    fn test_datetime_renders_in_fixed_format() {
        let col = column(ColumnType::Datetime);
        let t = Utc.with_ymd_and_hms(2026, 8, 21, 10, 30, 0).unwrap();
        assert_eq!(
            format_sql_value(&col, Some(&Value::Datetime(t))).unwrap(),
            "'2026-08-21 10:30:00'"
        );
    }

    #[test]
    fn test_non_datetime_in_datetime_column_is_rejected() {
        let col = ColumnDefinition::new("datetime", ColumnType::Datetime, false);
        let err = format_sql_value(&col, Some(&Value::Integer(5))).unwrap_err();
        assert!(err.to_string().contains("datetime"));
    }

    #[test]
    fn test_text_in_numeric_column_is_rejected() {
        let col = ColumnDefinition::new("level", ColumnType::Integer, false);
        let err = format_sql_value(&col, Some(&Value::from("31; DROP TABLE x"))).unwrap_err();
        assert!(matches!(err, Error::Formatting(_)));
        assert!(err.to_string().contains("level"));
    }

    #[test]
    fn test_scalars_in_string_column_render_quoted() {
        let col = column(ColumnType::String);
        assert_eq!(format_sql_value(&col, Some(&Value::Integer(42))).unwrap(), "'42'");
        assert_eq!(format_sql_value(&col, Some(&Value::Bool(true))).unwrap(), "'true'");

        let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            format_sql_value(&col, Some(&Value::Datetime(t))).unwrap(),
            "'2024-01-02 03:04:05'"
        );
    }
}
