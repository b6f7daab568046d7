//! Entity declarations and the standard log-event row
//!
//! An entity pairs a static table declaration with the typed mapping from a
//! [`LogRecord`] into one row. Declarations are plain data returned by
//! [`Entity::table_spec`]; validation happens in [`crate::metadata`], not
//! here, so a bad declaration surfaces as an error instead of a panic.

use crate::record::LogRecord;
use crate::value::{Row, Value};
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

/// Static declaration of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Column name as it appears in the table
    pub name: &'static str,
    /// Type name, resolved against [`crate::schema::ColumnType`]
    pub column_type: &'static str,
    /// Whether the store should accept missing values
    pub nullable: bool,
}

/// Static declaration of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    /// Table name, suffixed and qualified elsewhere
    pub name: &'static str,
    /// Ordered column declarations
    pub columns: &'static [ColumnSpec],
}

/// A row type that knows its table shape and how to absorb a log record.
///
/// `assign` is the explicit typed replacement for per-key setter dispatch:
/// the entity claims the context keys it has columns for and leaves the
/// rest to be folded into the overflow context blob.
pub trait Entity: Default {
    /// Static table declaration for this entity
    fn table_spec() -> TableSpec;

    /// Absorb the standard record fields
    fn set_record(&mut self, record: &LogRecord);

    /// Try to claim one context entry for a dedicated column.
    ///
    /// Returns true when the key mapped onto a column and the value had a
    /// usable type; a false return leaves the entry for the overflow blob.
    fn assign(&mut self, key: &str, value: &JsonValue) -> bool;

    /// Store the serialized overflow context
    fn set_context(&mut self, context: String);

    /// Render the populated columns as a sparse row
    fn to_row(&self) -> Row;
}

/// The standard log-event entity backing the `logger` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogEventRow {
    pub message: Option<String>,
    pub level: Option<i64>,
    pub level_name: Option<String>,
    pub context: Option<String>,
    pub channel: Option<String>,
    pub datetime: Option<DateTime<Utc>>,
}

impl Entity for LogEventRow {
    fn table_spec() -> TableSpec {
        TableSpec {
            name: "logger",
            columns: &[
                ColumnSpec {
                    name: "message",
                    column_type: "string",
                    nullable: false,
                },
                ColumnSpec {
                    name: "level",
                    column_type: "integer",
                    nullable: false,
                },
                ColumnSpec {
                    name: "levelName",
                    column_type: "string",
                    nullable: false,
                },
                ColumnSpec {
                    name: "context",
                    column_type: "string",
                    nullable: true,
                },
                ColumnSpec {
                    name: "channel",
                    column_type: "string",
                    nullable: false,
                },
                ColumnSpec {
                    name: "datetime",
                    column_type: "datetime",
                    nullable: false,
                },
            ],
        }
    }

    fn set_record(&mut self, record: &LogRecord) {
        self.message = Some(record.message.clone());
        self.level = Some(record.level);
        self.level_name = Some(record.level_name.clone());
        self.channel = Some(record.channel.clone());
        self.datetime = Some(record.datetime);
    }

    fn assign(&mut self, key: &str, value: &JsonValue) -> bool {
        match key {
            "message" => match value.as_str() {
                Some(s) => {
                    self.message = Some(s.to_string());
                    true
                }
                None => false,
            },
            "level" => match value.as_i64() {
                Some(n) => {
                    self.level = Some(n);
                    true
                }
                None => false,
            },
            "levelName" => match value.as_str() {
                Some(s) => {
                    self.level_name = Some(s.to_string());
                    true
                }
                None => false,
            },
            "channel" => match value.as_str() {
                Some(s) => {
                    self.channel = Some(s.to_string());
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn set_context(&mut self, context: String) {
        self.context = Some(context);
    }

    fn to_row(&self) -> Row {
        let mut row = Row::new();
        if let Some(message) = &self.message {
            row.insert("message".to_string(), Value::String(message.clone()));
        }
        if let Some(level) = self.level {
            row.insert("level".to_string(), Value::Integer(level));
        }
        if let Some(level_name) = &self.level_name {
            row.insert("levelName".to_string(), Value::String(level_name.clone()));
        }
        if let Some(context) = &self.context {
            row.insert("context".to_string(), Value::String(context.clone()));
        }
        if let Some(channel) = &self.channel {
            row.insert("channel".to_string(), Value::String(channel.clone()));
        }
        if let Some(datetime) = self.datetime {
            row.insert("datetime".to_string(), Value::Datetime(datetime));
        }
        row
    }
}
