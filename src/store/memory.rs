//! In-memory recording store
//!
//! A test double that records every call instead of talking to a real
//! service. Statements are kept verbatim so tests can assert on exact
//! rendered SQL; the failure toggles drive the error paths of callers.

use super::{QueryOutcome, StoreError, TableSchema, TableStore};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    tables: Vec<TableEntry>,
    statements: Vec<String>,
    creates: usize,
}

#[derive(Debug)]
struct TableEntry {
    dataset: String,
    name: String,
    schema: Option<TableSchema>,
}

/// Recording in-memory implementation of [`TableStore`].
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    state: Mutex<MemoryState>,
    refuse_statements: bool,
    refuse_creates: bool,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table so it looks pre-existing to callers
    pub fn with_existing_table(self, dataset: impl Into<String>, name: impl Into<String>) -> Self {
        self.state().tables.push(TableEntry {
            dataset: dataset.into(),
            name: name.into(),
            schema: None,
        });
        self
    }

    /// Make every statement come back as not completed
    pub fn with_incomplete_statements(mut self) -> Self {
        self.refuse_statements = true;
        self
    }

    /// Make every table creation fail
    pub fn with_failing_creates(mut self) -> Self {
        self.refuse_creates = true;
        self
    }

    /// Table names recorded for a dataset, in creation order
    pub fn tables_in(&self, dataset: &str) -> Vec<String> {
        self.state()
            .tables
            .iter()
            .filter(|t| t.dataset == dataset)
            .map(|t| t.name.clone())
            .collect()
    }

    /// Creation schema recorded for a table, if one was created
    pub fn schema_of(&self, dataset: &str, name: &str) -> Option<TableSchema> {
        self.state()
            .tables
            .iter()
            .find(|t| t.dataset == dataset && t.name == name)
            .and_then(|t| t.schema.clone())
    }

    /// Statements recorded in execution order
    pub fn statements(&self) -> Vec<String> {
        self.state().statements.clone()
    }

    /// Number of create-table calls accepted
    pub fn create_count(&self) -> usize {
        self.state().creates
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TableStore for MemoryTableStore {
    fn list_tables(&self, dataset: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.tables_in(dataset))
    }

    fn create_table(&self, dataset: &str, table: &str, schema: &TableSchema) -> Result<(), StoreError> {
        if self.refuse_creates {
            return Err(StoreError::new(format!(
                "Refused to create {}.{}",
                dataset, table
            )));
        }
        let mut state = self.state();
        state.tables.push(TableEntry {
            dataset: dataset.to_string(),
            name: table.to_string(),
            schema: Some(schema.clone()),
        });
        state.creates += 1;
        Ok(())
    }

    fn run_statement(&self, sql: &str) -> Result<QueryOutcome, StoreError> {
        self.state().statements.push(sql.to_string());
        if self.refuse_statements {
            Ok(QueryOutcome::incomplete())
        } else {
            Ok(QueryOutcome::done(Vec::new()))
        }
    }
}
