//! Table registry and alias assignment.
//!
//! A [`Schema`] is created once per logical database and populated during
//! start-up. Registration needs `&mut Schema`; once populated it can be shared
//! (`&Schema` / `Arc<Schema>`) and every statement builder borrows it read-only.
//!
//! # Example
//!
//! ```
//! use dalsql::Schema;
//!
//! let mut schema = Schema::new("app");
//! schema.add_table("foo", ["id", "name"])?;
//! schema.add_table("foe", ["id", "fooId"])?;
//!
//! assert_eq!(schema.table("foo")?.alias(), "f");
//! assert_eq!(schema.table("foe")?.alias(), "f1");
//! # Ok::<(), dalsql::DalError>(())
//! ```

mod field;
mod table;

#[cfg(test)]
mod tests;

pub use field::Field;
pub use table::Table;

use crate::error::{DalError, DalResult};
use crate::executor::Executor;
use crate::query::{Query, QueryKind};
use crate::row::{ExecResult, Row};
use crate::value::Value;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;

/// Statement-generation policy shared by every query built from a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Allow UPDATE and DELETE without any WHERE filter.
    ///
    /// Off by default: such statements fail with
    /// [`DalError::UnfilteredMutation`] instead of touching every row.
    pub allow_unfiltered_mutations: bool,
}

impl SchemaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_unfiltered_mutations(mut self, allow: bool) -> Self {
        self.allow_unfiltered_mutations = allow;
        self
    }
}

/// A registry of tables keyed by name, owning alias assignment.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    name: String,
    tables: IndexMap<String, Table>,
    /// alias -> table name
    aliases: HashMap<String, String>,
    config: SchemaConfig,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: SchemaConfig) -> Self {
        self.config = config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Create a table from `fields` (in order) and register it.
    pub fn add_table<I, S>(&mut self, name: &str, fields: I) -> DalResult<&Table>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.tables.contains_key(name) {
            return Err(DalError::DuplicateTable(name.to_string()));
        }
        let mut table = Table::new(name);
        table.add_fields(fields)?;
        self.define(table)
    }

    /// Register a prebuilt table, assigning its alias.
    pub fn define(&mut self, mut table: Table) -> DalResult<&Table> {
        let Some(first) = table.name().chars().next() else {
            return Err(DalError::validation("table name cannot be empty"));
        };
        if self.tables.contains_key(table.name()) {
            return Err(DalError::DuplicateTable(table.name().to_string()));
        }

        let alias = self.next_alias(first);
        tracing::debug!(
            target: "dalsql.schema",
            schema = %self.name,
            table = table.name(),
            alias = %alias,
            "registered table"
        );

        table.alias = alias.clone();
        self.aliases.insert(alias, table.name().to_string());
        let name = table.name().to_string();
        let entry = self.tables.entry(name).or_insert(table);
        Ok(entry)
    }

    /// First unused of `c`, `c1`, `c2`, ... where the counter restarts at 1
    /// for every registration.
    fn next_alias(&self, first: char) -> String {
        let base = first.to_string();
        if !self.aliases.contains_key(&base) {
            return base;
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{base}{n}");
            if !self.aliases.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Look up a registered table.
    pub fn table(&self, name: &str) -> DalResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| DalError::UnknownTable(name.to_string()))
    }

    /// Look up the table that was assigned `alias`.
    pub fn table_by_alias(&self, alias: &str) -> Option<&Table> {
        self.aliases
            .get(alias)
            .and_then(|name| self.tables.get(name))
    }

    /// Registered tables, in registration order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Start a query of `kind` against `table_name`.
    pub fn new_query(&self, table_name: &str, kind: QueryKind) -> DalResult<Query<'_>> {
        let table = self.table(table_name)?;
        Ok(Query::new(self, table, kind))
    }

    /// Start a SELECT.
    pub fn select(&self, table_name: &str) -> DalResult<Query<'_>> {
        self.new_query(table_name, QueryKind::Select)
    }

    /// Start an UPDATE.
    pub fn update(&self, table_name: &str) -> DalResult<Query<'_>> {
        self.new_query(table_name, QueryKind::Update)
    }

    /// Start a DELETE.
    pub fn delete(&self, table_name: &str) -> DalResult<Query<'_>> {
        self.new_query(table_name, QueryKind::Delete)
    }

    /// Start an INSERT.
    pub fn insert(&self, table_name: &str) -> DalResult<Query<'_>> {
        self.new_query(table_name, QueryKind::Insert)
    }

    /// Start a `COUNT(DISTINCT id)` query.
    pub fn count(&self, table_name: &str) -> DalResult<Query<'_>> {
        self.new_query(table_name, QueryKind::Count)
    }

    /// Run raw SQL that does not return rows.
    pub async fn exec(
        &self,
        conn: &impl Executor,
        sql: &str,
        args: &[Value],
    ) -> DalResult<ExecResult> {
        conn.execute(sql, args).await
    }

    /// Run raw SQL that returns rows.
    pub async fn query(
        &self,
        conn: &impl Executor,
        sql: &str,
        args: &[Value],
    ) -> DalResult<Vec<Row>> {
        conn.query(sql, args).await
    }
}
