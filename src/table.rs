//! Idempotent table provisioning
//!
//! `TableManager` makes sure a definition's table exists in a dataset
//! before anything writes to it. Existence is decided by listing the
//! dataset, so a second ensure never issues a second create.

use crate::schema::TableDefinition;
use crate::store::{FieldMode, FieldSchema, TableSchema, TableStore};
use crate::{Error, Result};

/// Table provisioning over a borrowed store.
pub struct TableManager<'a, S> {
    store: &'a S,
}

impl<'a, S: TableStore> TableManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Ensure the definition's table exists and return its qualified name.
    ///
    /// The candidate name is `<name>_<suffix>` when a suffix is given and
    /// the bare name otherwise. The returned reference is always
    /// `<dataset>.<candidate>`, whether the table was found or created.
    /// An existing table is trusted as-is; its shape is not compared
    /// against the definition.
    pub fn ensure_table(
        &self,
        def: &TableDefinition,
        dataset: &str,
        suffix: Option<&str>,
    ) -> Result<String> {
        let candidate = match suffix {
            Some(suffix) => format!("{}_{}", def.name, suffix),
            None => def.name.clone(),
        };

        let existing = self.store.list_tables(dataset)?;
        if existing.iter().any(|name| name == &candidate) {
            tracing::debug!(dataset, table = %candidate, "table already present");
        } else {
            let schema = creation_schema(def);
            self.store
                .create_table(dataset, &candidate, &schema)
                .map_err(Error::Schema)?;
            tracing::info!(dataset, table = %candidate, "created table");
        }

        Ok(format!("{}.{}", dataset, candidate))
    }
}

/// Copy a definition into a creation payload.
///
/// Non-nullable columns become `required` fields; nullable ones carry no
/// mode at all.
fn creation_schema(def: &TableDefinition) -> TableSchema {
    TableSchema {
        fields: def
            .columns
            .iter()
            .map(|column| FieldSchema {
                name: column.name.clone(),
                field_type: column.column_type,
                mode: if column.nullable {
                    None
                } else {
                    Some(FieldMode::Required)
                },
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDefinition, ColumnType};
    use crate::store::MemoryTableStore;

    fn sample_def() -> TableDefinition {
        TableDefinition::new(
            "logger",
            vec![
                ColumnDefinition::new("message", ColumnType::String, false),
                ColumnDefinition::new("context", ColumnType::String, true),
            ],
        )
    }

    #[test]
    fn test_creates_missing_table_and_qualifies_name() {
        let store = MemoryTableStore::new();
        let manager = TableManager::new(&store);

        let name = manager.ensure_table(&sample_def(), "acme", None).unwrap();
        assert_eq!(name, "acme.logger");
        assert_eq!(store.tables_in("acme"), vec!["logger"]);
    }

    #[test]
    fn test_second_ensure_skips_creation() {
        let store = MemoryTableStore::new();
        let manager = TableManager::new(&store);

        manager.ensure_table(&sample_def(), "acme", None).unwrap();
        let name = manager.ensure_table(&sample_def(), "acme", None).unwrap();

        assert_eq!(name, "acme.logger");
        assert_eq!(store.create_count(), 1);
    }

    #[test]
    fn test_suffix_changes_candidate_and_reference() {
        let store = MemoryTableStore::new().with_existing_table("acme", "logger");
        let manager = TableManager::new(&store);

        let name = manager
            .ensure_table(&sample_def(), "acme", Some("dev"))
            .unwrap();

        assert_eq!(name, "acme.logger_dev");
        assert_eq!(store.tables_in("acme"), vec!["logger", "logger_dev"]);
        assert_eq!(store.create_count(), 1);
    }

    #[test]
    fn test_existing_table_is_trusted() {
        let store = MemoryTableStore::new().with_existing_table("acme", "logger");
        let manager = TableManager::new(&store);

        let name = manager.ensure_table(&sample_def(), "acme", None).unwrap();
        assert_eq!(name, "acme.logger");
        assert_eq!(store.create_count(), 0);
    }

    #[test]
    fn test_creation_schema_maps_nullability_to_mode() {
        let schema = creation_schema(&sample_def());
        assert_eq!(schema.fields.len(), 2);

        assert_eq!(schema.fields[0].name, "message");
        assert_eq!(schema.fields[0].field_type, ColumnType::String);
        assert_eq!(schema.fields[0].mode, Some(FieldMode::Required));

        assert_eq!(schema.fields[1].name, "context");
        assert!(schema.fields[1].mode.is_none());
    }

    #[test]
    fn test_create_failure_maps_to_schema_error() {
        let store = MemoryTableStore::new().with_failing_creates();
        let manager = TableManager::new(&store);

        let err = manager.ensure_table(&sample_def(), "acme", None).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn test_listing_failure_maps_to_store_error() {
        let store = crate::store::SqliteTableStore::open_in_memory("acme").unwrap();
        let manager = TableManager::new(&store);

        let err = manager.ensure_table(&sample_def(), "other", None).unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }
}
