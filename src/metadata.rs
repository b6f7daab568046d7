//! Declaration validation - turning entity specs into table definitions
//!
//! [`describe`] runs the full validation on every call and returns a fresh
//! [`TableDefinition`]. Nothing is cached: callers that want the cost paid
//! once keep the returned definition themselves.

use crate::entity::{Entity, TableSpec};
use crate::schema::{ColumnDefinition, ColumnType, TableDefinition};
use crate::{Error, Result};
use std::collections::HashSet;

/// Validate an entity's declaration and build its table definition.
///
/// Rejects empty table names, empty column lists, empty column names,
/// duplicate column names, and unknown type names. Column order in the
/// result follows declaration order.
pub fn describe<E: Entity>() -> Result<TableDefinition> {
    validate(&E::table_spec())
}

fn validate(spec: &TableSpec) -> Result<TableDefinition> {
    if spec.name.trim().is_empty() {
        return Err(Error::Metadata("Entity declares no table name".to_string()));
    }
    if spec.columns.is_empty() {
        return Err(Error::Metadata(format!(
            "Table {} declares no columns",
            spec.name
        )));
    }

    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(spec.columns.len());
    for column in spec.columns {
        if column.name.trim().is_empty() {
            return Err(Error::Metadata(format!(
                "Table {} declares a column with no name",
                spec.name
            )));
        }
        if !seen.insert(column.name) {
            return Err(Error::Metadata(format!(
                "Table {} declares column {} twice",
                spec.name, column.name
            )));
        }
        let column_type: ColumnType = column.column_type.parse().map_err(|_| {
            Error::Metadata(format!(
                "Column {}.{} has unknown type {}",
                spec.name, column.name, column.column_type
            ))
        })?;
        columns.push(ColumnDefinition::new(column.name, column_type, column.nullable));
    }

    Ok(TableDefinition::new(spec.name, columns))
}
