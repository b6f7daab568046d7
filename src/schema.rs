//! Column schema model - validated table and column definitions
//!
//! A `TableDefinition` is the validated, owned form of an entity's static
//! declaration: an ordered list of `ColumnDefinition`s whose order fixes
//! the INSERT column order. Definitions are produced fresh by
//! [`crate::metadata::describe`] for every call and never cached.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Column value types understood by the table store.
///
/// Declarations spell these as strings; unknown names are rejected during
/// metadata validation rather than at statement-build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free-form text, single-quoted and escaped in statements
    String,
    /// 64-bit signed integer, emitted bare
    Integer,
    /// 64-bit float, emitted bare
    Float,
    /// Boolean, emitted bare as `true`/`false`
    Boolean,
    /// Timestamp, re-rendered as `YYYY-MM-DD HH:MM:SS` and quoted
    Datetime,
}

impl ColumnType {
    /// Get the canonical lowercase name used in create-table payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Datetime => "datetime",
        }
    }

    /// Get all column types
    pub fn all() -> &'static [ColumnType] {
        &[
            ColumnType::String,
            ColumnType::Integer,
            ColumnType::Float,
            ColumnType::Boolean,
            ColumnType::Datetime,
        ]
    }
}

impl FromStr for ColumnType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "string" | "str" | "text" => Ok(ColumnType::String),
            "integer" | "int" => Ok(ColumnType::Integer),
            "float" | "double" => Ok(ColumnType::Float),
            "boolean" | "bool" => Ok(ColumnType::Boolean),
            "datetime" | "timestamp" => Ok(ColumnType::Datetime),
            _ => Err(Error::Metadata(format!("Unknown column type: {}", s))),
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One validated column: name, type, and nullability.
///
/// `nullable` only matters at table-creation time, where `false` becomes a
/// `required` mode marker in the creation payload. Statement building never
/// consults it: a null or empty value formats as `null` either way and the
/// store enforces required columns on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name, unique within its table
    pub name: String,
    /// Declared value type
    pub column_type: ColumnType,
    /// Whether the store should accept missing values
    pub nullable: bool,
}

impl ColumnDefinition {
    /// Create a new column definition
    pub fn new(name: impl Into<String>, column_type: ColumnType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable,
        }
    }
}

/// A validated table: name plus ordered columns.
///
/// Column order defines the INSERT column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name, unique within a dataset
    pub name: String,
    /// Ordered column definitions
    pub columns: Vec<ColumnDefinition>,
}

impl TableDefinition {
    /// Create a new table definition
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDefinition>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_roundtrip() {
        for column_type in ColumnType::all() {
            let s = column_type.as_str();
            let parsed: ColumnType = s.parse().unwrap();
            assert_eq!(*column_type, parsed);
        }
    }

    #[test]
    fn test_column_type_aliases() {
        assert_eq!(ColumnType::from_str("str").unwrap(), ColumnType::String);
        assert_eq!(ColumnType::from_str("int").unwrap(), ColumnType::Integer);
        assert_eq!(ColumnType::from_str("bool").unwrap(), ColumnType::Boolean);
        assert_eq!(ColumnType::from_str("timestamp").unwrap(), ColumnType::Datetime);
        assert_eq!(ColumnType::from_str("DATETIME").unwrap(), ColumnType::Datetime);
    }

    #[test]
    fn test_unknown_column_type() {
        let err = ColumnType::from_str("geography").unwrap_err();
        assert!(err.to_string().contains("geography"));
    }

    #[test]
    fn test_column_lookup() {
        let def = TableDefinition::new(
            "logger",
            vec![
                ColumnDefinition::new("message", ColumnType::String, false),
                ColumnDefinition::new("level", ColumnType::Integer, false),
            ],
        );

        assert_eq!(def.column_names(), vec!["message", "level"]);
        assert_eq!(def.column("level").unwrap().column_type, ColumnType::Integer);
        assert!(def.column("missing").is_none());
    }
}
