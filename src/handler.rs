//! Log persistence handler
//!
//! `TableStoreHandler` owns a store client plus a settings value and turns
//! every incoming record into one INSERT against a table provisioned once
//! at construction. Excluded environments skip persistence and echo the
//! record's formatted text onto the local tracing output instead; the
//! `show_results` setting echoes it in addition to persisting.

use crate::config::Settings;
use crate::entity::{Entity, LogEventRow};
use crate::metadata;
use crate::query::QueryBuilder;
use crate::record::LogRecord;
use crate::store::TableStore;
use crate::table::TableManager;
use crate::Result;
use serde_json::Value as JsonValue;
use std::marker::PhantomData;

/// Persists log records into one table of a dataset.
///
/// The entity type decides the table shape and the record-to-row mapping;
/// it defaults to the standard [`LogEventRow`].
pub struct TableStoreHandler<S, E = LogEventRow> {
    store: S,
    settings: Settings,
    dataset_table: String,
    _entity: PhantomData<E>,
}

impl<S: TableStore, E: Entity> TableStoreHandler<S, E> {
    /// Validate the entity declaration, ensure its table exists, and wire
    /// the handler up.
    ///
    /// The table is provisioned even for excluded environments, so turning
    /// an environment back on needs no redeploy.
    pub fn new(store: S, settings: Settings) -> Result<Self> {
        let def = metadata::describe::<E>()?;
        let dataset_table = TableManager::new(&store).ensure_table(
            &def,
            &settings.dataset,
            settings.table_suffix.as_deref(),
        )?;
        tracing::debug!(
            table = %dataset_table,
            environment = %settings.environment,
            "log handler ready"
        );

        Ok(Self {
            store,
            settings,
            dataset_table,
            _entity: PhantomData,
        })
    }

    /// Qualified `dataset.table` name this handler writes to
    pub fn dataset_table(&self) -> &str {
        &self.dataset_table
    }

    /// Settings this handler was built with
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The owned store client
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Persist one record.
    ///
    /// Standard fields are absorbed first, then each context entry is
    /// offered to the entity; entries the entity claims override the
    /// standard fields, and the rest are serialized into the overflow
    /// context column. An empty leftover leaves that column unset.
    pub fn write(&self, record: &LogRecord) -> Result<()> {
        let mut entity = E::default();
        entity.set_record(record);

        let mut leftover = serde_json::Map::new();
        for (key, value) in &record.context {
            if !entity.assign(key, value) {
                leftover.insert(key.clone(), value.clone());
            }
        }
        if !leftover.is_empty() {
            entity.set_context(JsonValue::Object(leftover).to_string());
        }

        let excluded = self.settings.is_excluded();
        if !excluded {
            let def = metadata::describe::<E>()?;
            QueryBuilder::insert(&def, &self.dataset_table)
                .values(entity.to_row())
                .execute(&self.store)?;
        }
        if self.settings.show_results || excluded {
            mirror(record);
        }
        Ok(())
    }
}

/// Echo a record's formatted text line by line onto the tracing output.
///
/// Runs of carriage returns and newlines count as one break and trailing
/// whitespace is dropped. The record's level picks the tracing level.
fn mirror(record: &LogRecord) {
    for line in record.formatted.trim_end().split(['\r', '\n']) {
        if line.is_empty() {
            continue;
        }
        match record.level {
            level if level < 200 => tracing::debug!(target: "tablog::mirror", "{}", line),
            level if level < 300 => tracing::info!(target: "tablog::mirror", "{}", line),
            level if level < 400 => tracing::warn!(target: "tablog::mirror", "{}", line),
            _ => tracing::error!(target: "tablog::mirror", "{}", line),
        }
    }
}
