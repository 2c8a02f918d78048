//! JOIN targets and ON-clause compilation.

use super::filter::parse_filter_name;
use crate::error::{DalError, DalResult};
use crate::schema::{Schema, Table};
use crate::value::Value;

/// Right-hand side of one ON condition.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinTarget {
    /// Compared to a bound literal
    Value(Value),
    /// Compared to a column of another registered table
    Field { table: String, field: String },
}

/// One ON-clause condition. `field_name` may carry an operator prefix like filters do.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinField {
    pub field_name: String,
    pub target: JoinTarget,
}

/// A joined table and its ON conditions, in the order they were added.
#[derive(Debug, Clone)]
pub struct Join<'s> {
    table: &'s Table,
    fields: Vec<JoinField>,
}

impl<'s> Join<'s> {
    pub(crate) fn new(table: &'s Table) -> Self {
        Self {
            table,
            fields: Vec::new(),
        }
    }

    pub fn table(&self) -> &'s Table {
        self.table
    }

    pub fn fields(&self) -> &[JoinField] {
        &self.fields
    }

    pub(crate) fn push(&mut self, field: JoinField) {
        self.fields.push(field);
    }

    /// Render `JOIN `t` `a` ON ...`, pushing literal ON values onto `values`.
    pub(crate) fn build(&self, schema: &Schema, values: &mut Vec<Value>) -> DalResult<String> {
        if self.fields.is_empty() {
            return Err(DalError::builder_state(format!(
                "join on `{}` has no ON conditions",
                self.table.name()
            )));
        }

        let alias = self.table.alias();
        let mut on = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let (op, column) = parse_filter_name(&field.field_name);
            if column.is_empty() {
                return Err(DalError::builder_state(format!(
                    "ON condition `{}` has no column name",
                    field.field_name
                )));
            }
            match &field.target {
                JoinTarget::Value(value) => {
                    values.push(value.clone());
                    on.push(format!("`{alias}`.`{column}` {op} ?"));
                }
                JoinTarget::Field {
                    table,
                    field: other,
                } => {
                    let other_alias = schema.table(table)?.alias();
                    on.push(format!("`{alias}`.`{column}` {op} `{other_alias}`.`{other}`"));
                }
            }
        }

        Ok(format!(
            "JOIN `{}` `{}` ON {}",
            self.table.name(),
            alias,
            on.join(" AND ")
        ))
    }
}
