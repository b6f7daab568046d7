//! SQL statement builder
//!
//! Builders are constructed against a table definition and accumulate
//! parts through chained calls until [`QueryBuilder::compile`] or
//! [`QueryBuilder::execute`] consumes them. Reuse means building again;
//! there is no reset. The rendered text is final and stores run it
//! verbatim.
//!
//! Rendered shapes:
//!
//! ```text
//! INSERT INTO <table> ( <c1>, <c2> ) VALUES (v1,v2), (v3,v4)
//! UPDATE <table> SET <c> = "<v>"[ WHERE <expr>]
//! SELECT <cols> FROM <table>[ WHERE <expr>][ GROUP BY <cols>][ ORDER BY <col> <dir>]
//! DELETE FROM <table>[ WHERE <expr>]
//! ```

use crate::schema::TableDefinition;
use crate::store::TableStore;
use crate::value::{format_sql_value, Row};
use crate::{Error, Result};

/// Kind of statement a builder renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Select => "SELECT",
            QueryKind::Insert => "INSERT",
            QueryKind::Update => "UPDATE",
            QueryKind::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Single-statement builder over one table definition.
pub struct QueryBuilder<'a> {
    kind: QueryKind,
    def: &'a TableDefinition,
    table: String,
    select: Vec<String>,
    values: Vec<Row>,
    set: Vec<(String, String)>,
    where_expr: Option<String>,
    group_by: Vec<String>,
    order_by: Option<(String, SortOrder)>,
    max_results: Option<usize>,
    first_result: Option<usize>,
}

impl<'a> QueryBuilder<'a> {
    fn new(kind: QueryKind, def: &'a TableDefinition, table: impl Into<String>) -> Self {
        Self {
            kind,
            def,
            table: table.into(),
            select: Vec::new(),
            values: Vec::new(),
            set: Vec::new(),
            where_expr: None,
            group_by: Vec::new(),
            order_by: None,
            max_results: None,
            first_result: None,
        }
    }

    /// Start an INSERT into the given qualified table
    pub fn insert(def: &'a TableDefinition, table: impl Into<String>) -> Self {
        Self::new(QueryKind::Insert, def, table)
    }

    /// Start a SELECT from the given qualified table
    pub fn select(def: &'a TableDefinition, table: impl Into<String>) -> Self {
        Self::new(QueryKind::Select, def, table)
    }

    /// Start an UPDATE of the given qualified table
    pub fn update(def: &'a TableDefinition, table: impl Into<String>) -> Self {
        Self::new(QueryKind::Update, def, table)
    }

    /// Start a DELETE from the given qualified table
    pub fn delete(def: &'a TableDefinition, table: impl Into<String>) -> Self {
        Self::new(QueryKind::Delete, def, table)
    }

    /// Append columns to the SELECT list.
    ///
    /// A SELECT with no columns added compiles to all declared columns in
    /// definition order.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.select.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    /// Append one row of values; each call adds one tuple to the INSERT
    pub fn values(mut self, row: Row) -> Self {
        self.values.push(row);
        self
    }

    /// Append one SET assignment; the value is rendered double-quoted
    pub fn set(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set.push((column.into(), value.into()));
        self
    }

    /// Replace the WHERE expression
    pub fn where_clause(mut self, expr: impl Into<String>) -> Self {
        self.where_expr = Some(expr.into());
        self
    }

    /// AND another expression onto the WHERE clause, starting one if unset
    pub fn and_where(mut self, expr: impl Into<String>) -> Self {
        let expr = expr.into();
        self.where_expr = match self.where_expr.take() {
            Some(existing) => Some(format!("{} AND {}", existing, expr)),
            None => Some(expr),
        };
        self
    }

    /// Replace the GROUP BY column list
    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.group_by = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Replace the ORDER BY column; direction defaults to ascending
    pub fn order_by(mut self, column: impl Into<String>, order: Option<SortOrder>) -> Self {
        self.order_by = Some((column.into(), order.unwrap_or(SortOrder::Asc)));
        self
    }

    /// Store a result-count hint; statement compilation never reads it
    pub fn set_max_results(mut self, count: usize) -> Self {
        self.max_results = Some(count);
        self
    }

    /// Store a result-offset hint; statement compilation never reads it
    pub fn set_first_result(mut self, offset: usize) -> Self {
        self.first_result = Some(offset);
        self
    }

    /// The stored result-count hint
    pub fn max_results(&self) -> Option<usize> {
        self.max_results
    }

    /// The stored result-offset hint
    pub fn first_result(&self) -> Option<usize> {
        self.first_result
    }

    /// Render the statement, consuming the builder.
    ///
    /// An INSERT with no value rows and an UPDATE with no assignments are
    /// refused instead of rendered as dangling text.
    pub fn compile(self) -> Result<String> {
        match self.kind {
            QueryKind::Insert => self.compile_insert(),
            QueryKind::Select => Ok(self.compile_select()),
            QueryKind::Update => self.compile_update(),
            QueryKind::Delete => Ok(self.compile_delete()),
        }
    }

    /// Render and run the statement, consuming the builder.
    ///
    /// Returns the store's result rows on completion and fails when the
    /// store reports the statement as not completed.
    pub fn execute(self, store: &impl TableStore) -> Result<Vec<serde_json::Value>> {
        let kind = self.kind;
        let sql = self.compile()?;
        tracing::debug!(kind = %kind, sql = %sql, "executing statement");

        let outcome = store.run_statement(&sql)?;
        if !outcome.complete {
            return Err(Error::QueryExecution(sql));
        }
        Ok(outcome.rows)
    }

    fn compile_insert(&self) -> Result<String> {
        if self.values.is_empty() {
            return Err(Error::Formatting(format!(
                "INSERT INTO {} has no value rows",
                self.table
            )));
        }

        let mut tuples = Vec::with_capacity(self.values.len());
        for row in &self.values {
            let mut rendered = Vec::with_capacity(self.def.columns.len());
            for column in &self.def.columns {
                rendered.push(format_sql_value(column, row.get(&column.name))?);
            }
            tuples.push(format!("({})", rendered.join(",")));
        }

        Ok(format!(
            "INSERT INTO {} ( {} ) VALUES {}",
            self.table,
            self.def.column_names().join(", "),
            tuples.join(", ")
        ))
    }

    fn compile_select(&self) -> String {
        let columns = if self.select.is_empty() {
            self.def.column_names().join(", ")
        } else {
            self.select.join(", ")
        };

        let mut sql = format!("SELECT {} FROM {}", columns, self.table);
        if let Some(expr) = &self.where_expr {
            sql.push_str(" WHERE ");
            sql.push_str(expr);
        }
        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }
        if let Some((column, order)) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(column);
            sql.push(' ');
            sql.push_str(order.as_str());
        }
        sql
    }

    fn compile_update(&self) -> Result<String> {
        if self.set.is_empty() {
            return Err(Error::Formatting(format!(
                "UPDATE {} has no assignments",
                self.table
            )));
        }

        let assignments: Vec<String> = self
            .set
            .iter()
            .map(|(column, value)| format!("{} = \"{}\"", column, value))
            .collect();

        let mut sql = format!("UPDATE {} SET {}", self.table, assignments.join(", "));
        if let Some(expr) = &self.where_expr {
            sql.push_str(" WHERE ");
            sql.push_str(expr);
        }
        Ok(sql)
    }

    fn compile_delete(&self) -> String {
        let mut sql = format!("DELETE FROM {}", self.table);
        if let Some(expr) = &self.where_expr {
            sql.push_str(" WHERE ");
            sql.push_str(expr);
        }
        sql
    }
}
