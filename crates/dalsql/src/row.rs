//! Result shapes returned by an [`Executor`](crate::Executor).

use crate::error::{DalError, DalResult};
use crate::value::Value;
use std::sync::Arc;

/// One result row: values in column order, addressable by index or name.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Create a row. Executors usually share one `columns` slice across a result set.
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value by column position.
    pub fn get_idx(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Get a value by column name (first match).
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by column name, failing with [`DalError::NotFound`] if absent.
    pub fn try_get(&self, column: &str) -> DalResult<&Value> {
        self.get(column)
            .ok_or_else(|| DalError::not_found(format!("column `{column}` not in row")))
    }
}

/// Outcome of an INSERT/UPDATE/DELETE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: Option<u64>,
}

impl ExecResult {
    pub fn new(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            last_insert_id: None,
        }
    }

    pub fn with_last_insert_id(mut self, id: u64) -> Self {
        self.last_insert_id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_and_index() {
        let columns: Arc<[String]> = vec!["id".to_string(), "name".to_string()].into();
        let row = Row::new(columns, vec![Value::from(1i64), Value::from("alice")]);

        assert_eq!(row.get("name"), Some(&Value::from("alice")));
        assert_eq!(row.get_idx(0), Some(&Value::I64(1)));
        assert!(row.get("email").is_none());
        assert!(row.try_get("email").unwrap_err().is_not_found());
    }
}
