//! Table store abstraction
//!
//! The [`TableStore`] trait is the seam between statement/schema building
//! and whatever service actually holds the tables. Implementations move
//! payloads as given; a backend whose SQL dialect quotes differently may
//! translate the literal syntax, never the statement's meaning.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryTableStore;
pub use sqlite::SqliteTableStore;

use crate::schema::ColumnType;
use serde::{Deserialize, Serialize};

/// Transport-level failure reported by a store client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Field mode marker in a creation payload.
///
/// Only `required` is ever emitted; a nullable field simply omits the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldMode {
    Required,
}

/// One field in a table-creation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<FieldMode>,
}

/// Creation payload for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub fields: Vec<FieldSchema>,
}

/// Result of running one statement.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Whether the store reports the statement as completed
    pub complete: bool,
    /// Result rows for statements that return any, one JSON object each
    pub rows: Vec<serde_json::Value>,
}

impl QueryOutcome {
    /// A completed statement with the given result rows
    pub fn done(rows: Vec<serde_json::Value>) -> Self {
        Self { complete: true, rows }
    }

    /// A statement the store did not finish
    pub fn incomplete() -> Self {
        Self {
            complete: false,
            rows: Vec::new(),
        }
    }
}

/// Client interface to a dataset-scoped table service.
pub trait TableStore {
    /// List the table names currently present in a dataset
    fn list_tables(&self, dataset: &str) -> Result<Vec<String>, StoreError>;

    /// Create a table in a dataset with the given field schema
    fn create_table(&self, dataset: &str, table: &str, schema: &TableSchema) -> Result<(), StoreError>;

    /// Run one already-rendered SQL statement
    fn run_statement(&self, sql: &str) -> Result<QueryOutcome, StoreError>;
}
