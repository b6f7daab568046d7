//! # Tablog - Schema-Driven Log Persistence
//!
//! Structured log events persisted into columnar analytics tables.
//!
//! Tablog provides:
//! - Entity declarations that derive validated table schemas
//! - A statement builder rendering INSERT/SELECT/UPDATE/DELETE text with
//!   type-correct value formatting
//! - Idempotent table provisioning inside a dataset
//! - A handler that adapts log records into typed rows plus a JSON
//!   overflow context blob
//! - A `TableStore` seam with in-memory and SQLite implementations

pub mod config;
pub mod entity;
pub mod handler;
pub mod metadata;
pub mod query;
pub mod record;
pub mod schema;
pub mod store;
pub mod table;
pub mod value;

// Re-exports for convenient access
pub use config::{parse_exclude_list, Settings};
pub use entity::{ColumnSpec, Entity, LogEventRow, TableSpec};
pub use handler::TableStoreHandler;
pub use query::{QueryBuilder, QueryKind, SortOrder};
pub use record::{Level, LogRecord};
pub use schema::{ColumnDefinition, ColumnType, TableDefinition};
pub use store::{MemoryTableStore, SqliteTableStore, StoreError, TableStore};
pub use table::TableManager;
pub use value::{format_sql_value, Row, Value};

/// Result type alias for Tablog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Tablog operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Table creation failed: {0}")]
    Schema(store::StoreError),

    #[error("Query failed to complete: {0}")]
    QueryExecution(String),

    #[error("Formatting error: {0}")]
    Formatting(String),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
