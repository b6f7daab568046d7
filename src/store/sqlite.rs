//! SQLite-backed table store
//!
//! A local development backend. The dataset is attached as a named schema
//! so statements qualified as `dataset.table` resolve as written. Rendered
//! literals carry backslash escapes SQLite does not read, so
//! `run_statement` rewrites the quoting into SQLite's dialect before
//! execution. Creation payloads map onto SQLite column types, with
//! `required` fields becoming `NOT NULL` constraints.

use super::{FieldMode, QueryOutcome, StoreError, TableSchema, TableStore};
use crate::schema::ColumnType;
use crate::Result;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::Value as JsonValue;
use std::path::Path;

/// [`TableStore`] over a SQLite database.
pub struct SqliteTableStore {
    conn: Connection,
}

impl SqliteTableStore {
    /// Open a database file, attaching it as the named dataset
    pub fn open(path: &Path, dataset: &str) -> Result<Self> {
        check_ident(dataset)?;
        let conn = Connection::open_in_memory().map_err(store_err)?;
        let location = path.display().to_string().replace('\'', "''");
        conn.execute_batch(&format!(
            "ATTACH DATABASE '{}' AS \"{}\"",
            location, dataset
        ))
        .map_err(store_err)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database, attaching an empty dataset to it
    pub fn open_in_memory(dataset: &str) -> Result<Self> {
        check_ident(dataset)?;
        let conn = Connection::open_in_memory().map_err(store_err)?;
        conn.execute_batch(&format!("ATTACH DATABASE ':memory:' AS \"{}\"", dataset))
            .map_err(store_err)?;
        Ok(Self { conn })
    }

    fn query_rows(&self, sql: &str) -> std::result::Result<Vec<JsonValue>, StoreError> {
        let mut stmt = self.conn.prepare(sql).map_err(store_err)?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();

        let mut rows = stmt.query([]).map_err(store_err)?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(store_err)? {
            let mut object = serde_json::Map::new();
            for (i, name) in names.iter().enumerate() {
                let value = match row.get_ref(i).map_err(store_err)? {
                    ValueRef::Null => JsonValue::Null,
                    ValueRef::Integer(n) => JsonValue::from(n),
                    ValueRef::Real(f) => JsonValue::from(f),
                    ValueRef::Text(t) => JsonValue::from(String::from_utf8_lossy(t).into_owned()),
                    ValueRef::Blob(_) => JsonValue::Null,
                };
                object.insert(name.clone(), value);
            }
            out.push(JsonValue::Object(object));
        }
        Ok(out)
    }
}

impl TableStore for SqliteTableStore {
    fn list_tables(&self, dataset: &str) -> std::result::Result<Vec<String>, StoreError> {
        check_ident(dataset)?;
        let sql = format!(
            "SELECT name FROM \"{}\".sqlite_master WHERE type = 'table' ORDER BY name",
            dataset
        );
        let mut stmt = self.conn.prepare(&sql).map_err(store_err)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(store_err)?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(store_err)?;
        Ok(names)
    }

    fn create_table(
        &self,
        dataset: &str,
        table: &str,
        schema: &TableSchema,
    ) -> std::result::Result<(), StoreError> {
        check_ident(dataset)?;
        check_ident(table)?;

        let mut columns = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            check_ident(&field.name)?;
            let mut column = format!("\"{}\" {}", field.name, sqlite_type(field.field_type));
            if field.mode == Some(FieldMode::Required) {
                column.push_str(" NOT NULL");
            }
            columns.push(column);
        }

        let sql = format!(
            "CREATE TABLE \"{}\".\"{}\" ({})",
            dataset,
            table,
            columns.join(", ")
        );
        self.conn.execute_batch(&sql).map_err(store_err)
    }

    fn run_statement(&self, sql: &str) -> std::result::Result<QueryOutcome, StoreError> {
        let sql = adapt_literals(sql);
        let head = sql.trim_start();
        let is_select = head
            .get(..6)
            .map(|h| h.eq_ignore_ascii_case("SELECT"))
            .unwrap_or(false);

        if is_select {
            Ok(QueryOutcome::done(self.query_rows(&sql)?))
        } else {
            self.conn.execute_batch(&sql).map_err(store_err)?;
            Ok(QueryOutcome::done(Vec::new()))
        }
    }
}

fn store_err(e: rusqlite::Error) -> StoreError {
    StoreError::new(e.to_string())
}

fn sqlite_type(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::String => "TEXT",
        ColumnType::Integer => "INTEGER",
        ColumnType::Float => "REAL",
        ColumnType::Boolean => "INTEGER",
        ColumnType::Datetime => "TEXT",
    }
}

fn check_ident(name: &str) -> std::result::Result<(), StoreError> {
    let mut chars = name.chars();
    let ok = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if ok {
        Ok(())
    } else {
        Err(StoreError::new(format!("Invalid identifier: {:?}", name)))
    }
}

/// Rewrite rendered single-quoted literals into SQLite's dialect.
///
/// Generated statements escape with backslashes inside single-quoted
/// literals, so a quote inside a literal only ever appears escaped.
/// SQLite reads no backslash escapes: a single quote doubles instead and
/// an escaped double quote becomes the plain character. A NUL byte has no
/// literal form in SQLite at all, so one is spliced in as a blob.
/// Double-quoted tokens and text outside literals pass through untouched.
fn adapt_literals(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars();
    let mut in_quote = false;
    let mut in_double = false;
    while let Some(c) = chars.next() {
        match c {
            '"' if !in_quote => {
                in_double = !in_double;
                out.push('"');
            }
            '\'' if !in_double => {
                in_quote = !in_quote;
                out.push('\'');
            }
            '\\' if in_quote => match chars.next() {
                Some('\'') => out.push_str("''"),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('0') => out.push_str("'||x'00'||'"),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            _ => out.push(c),
        }
    }
    out
}
