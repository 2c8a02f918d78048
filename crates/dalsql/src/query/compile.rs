//! Per-kind SQL generation.
//!
//! Every identifier is backtick-quoted and every value is a `?` placeholder,
//! except LIMIT/OFFSET and the raw GROUP BY / ORDER BY text. Values are pushed
//! in the same left-to-right order as their placeholders appear.

use super::filter::build_where;
use super::{CompiledQuery, Filter, Query, QueryKind};
use crate::error::{DalError, DalResult};
use crate::value::Value;

impl Query<'_> {
    pub(super) fn compile(&self) -> DalResult<CompiledQuery> {
        let mut values = Vec::new();
        let sql = match self.kind {
            QueryKind::Select => self.compile_select(&mut values)?,
            QueryKind::Insert => self.compile_insert(&mut values)?,
            QueryKind::Update => self.compile_update(&mut values)?,
            QueryKind::Delete => self.compile_delete(&mut values)?,
            QueryKind::Count => self.compile_count(&mut values)?,
        };
        Ok(CompiledQuery { sql, values })
    }

    fn compile_select(&self, values: &mut Vec<Value>) -> DalResult<String> {
        let alias = self.table.alias();
        let mut cols: Vec<String> = self
            .table
            .field_names()
            .map(|name| format!("`{alias}`.`{name}`"))
            .collect();
        cols.extend(self.extra_selects.iter().cloned());
        if cols.is_empty() {
            return Err(DalError::builder_state(format!(
                "table `{}` declares no fields to select",
                self.table.name()
            )));
        }

        let mut sql = format!(
            "SELECT {} FROM `{}` `{}`",
            cols.join(", "),
            self.table.name(),
            alias
        );

        // Join values are bound before WHERE values: their placeholders come first.
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(&join.build(self.schema, values)?);
        }

        let where_sql = build_where(&self.filters, alias, values)?;
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if let Some(group) = &self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group);
        }

        if let Some((field, dir)) = &self.order_by {
            sql.push_str(&format!(" ORDER BY {} {}", field, dir.as_sql()));
        }

        if self.limit > 0 {
            sql.push_str(&format!(" LIMIT {}", self.limit));
        }

        if self.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", self.offset));
        }

        Ok(sql)
    }

    fn compile_insert(&self, values: &mut Vec<Value>) -> DalResult<String> {
        self.require_set_fields()?;
        if !self.filters.is_empty() || !self.joins.is_empty() {
            return Err(DalError::builder_state(format!(
                "INSERT into `{}` cannot carry filters or joins",
                self.table.name()
            )));
        }

        let mut cols = Vec::with_capacity(self.set_fields.len());
        let mut placeholders = Vec::with_capacity(self.set_fields.len());
        for field in &self.set_fields {
            cols.push(format!("`{}`", field.name));
            placeholders.push("?");
            values.push(field.value.clone());
        }

        Ok(format!(
            "INSERT INTO `{}` ({}) VALUES ({})",
            self.table.name(),
            cols.join(","),
            placeholders.join(",")
        ))
    }

    fn compile_update(&self, values: &mut Vec<Value>) -> DalResult<String> {
        self.require_set_fields()?;

        let alias = self.table.alias();
        let sets: Vec<String> = self
            .set_fields
            .iter()
            .map(|field| {
                values.push(field.value.clone());
                format!("`{alias}`.`{}` = ?", field.name)
            })
            .collect();

        let mut sql = format!(
            "UPDATE `{}` `{}` SET {}",
            self.table.name(),
            alias,
            sets.join(", ")
        );
        let where_sql = build_where(&self.filters, alias, values)?;
        self.push_mutation_where(&mut sql, &where_sql)?;
        Ok(sql)
    }

    /// Multi-table DELETE form: the executor's dialect must accept `DELETE ... USING`.
    fn compile_delete(&self, values: &mut Vec<Value>) -> DalResult<String> {
        let alias = self.table.alias();
        let mut sql = format!(
            "DELETE FROM `{}` USING `{}` AS `{}`",
            alias,
            self.table.name(),
            alias
        );
        let where_sql = build_where(&self.filters, alias, values)?;
        self.push_mutation_where(&mut sql, &where_sql)?;
        Ok(sql)
    }

    fn compile_count(&self, values: &mut Vec<Value>) -> DalResult<String> {
        let id = self.table.field("id")?;
        let alias = self.table.alias();
        let mut sql = format!(
            "SELECT COUNT(DISTINCT `{}`.`{}`) FROM `{}` `{}`",
            alias,
            id.name,
            self.table.name(),
            alias
        );
        let where_sql = build_where(&self.filters, alias, values)?;
        if !where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }
        Ok(sql)
    }

    fn require_set_fields(&self) -> DalResult<()> {
        if self.set_fields.is_empty() {
            return Err(DalError::MissingFields {
                table: self.table.name().to_string(),
                kind: self.kind.as_str().to_uppercase(),
            });
        }
        Ok(())
    }

    fn has_conditions(&self) -> bool {
        self.filters
            .iter()
            .any(|f| matches!(f, Filter::Condition(_)))
    }

    /// A filter list made only of `and()`/`or()` markers counts as unfiltered.
    fn push_mutation_where(&self, sql: &mut String, where_sql: &str) -> DalResult<()> {
        if self.has_conditions() {
            sql.push_str(" WHERE ");
            sql.push_str(where_sql);
            return Ok(());
        }
        if self.schema.config().allow_unfiltered_mutations {
            tracing::debug!(
                target: "dalsql.query",
                kind = %self.kind,
                table = self.table.name(),
                "compiling unfiltered mutation"
            );
            return Ok(());
        }
        Err(DalError::UnfilteredMutation {
            table: self.table.name().to_string(),
            kind: self.kind.as_str().to_uppercase(),
        })
    }
}
