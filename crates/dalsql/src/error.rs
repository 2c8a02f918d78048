//! Error types for dalsql

use std::time::Duration;
use thiserror::Error;

/// Result type alias for dalsql operations
pub type DalResult<T> = Result<T, DalError>;

/// Errors raised while declaring a schema, building a statement, or executing it.
///
/// The first group of variants are programmer/configuration errors found while
/// building SQL. The second group comes from the executor after compilation and
/// is the only kind a caller is expected to recover from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DalError {
    /// A table with this name is already registered
    #[error("a table named `{0}` has already been defined")]
    DuplicateTable(String),

    /// The table name is not registered in the schema
    #[error("no table named `{0}` has been defined")]
    UnknownTable(String),

    /// The field already exists on the table
    #[error("the field `{table}`.`{field}` has already been defined")]
    DuplicateField { table: String, field: String },

    /// The field is not declared on the table
    #[error("field `{table}`.`{field}` not found")]
    MissingField { table: String, field: String },

    /// INSERT/UPDATE compiled without any SET entries
    #[error("{kind} on `{table}` has no fields to set")]
    MissingFields { table: String, kind: String },

    /// UPDATE/DELETE compiled without any WHERE filter
    #[error("{kind} on `{table}` has no filters; enable `allow_unfiltered_mutations` to permit it")]
    UnfilteredMutation { table: String, kind: String },

    /// Builder methods called in an invalid order or with invalid state
    #[error("invalid builder state: {0}")]
    BuilderState(String),

    /// The requested query kind is not one of select/insert/update/delete/count
    #[error("unsupported query kind `{0}`")]
    UnsupportedQueryKind(String),

    /// Malformed names or arguments
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution error reported by the driver
    #[error("Query error: {0}")]
    Query(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Statement timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(Duration),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl DalError {
    /// Create a builder-state error
    pub fn builder_state(message: impl Into<String>) -> Self {
        Self::BuilderState(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a missing field error for `table`.`field`
    pub fn missing_field(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            table: table.into(),
            field: field.into(),
        }
    }

    /// True for errors raised while declaring a schema or building a statement.
    ///
    /// These never come from the executor and are not worth retrying.
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateTable(_)
                | Self::UnknownTable(_)
                | Self::DuplicateField { .. }
                | Self::MissingField { .. }
                | Self::MissingFields { .. }
                | Self::UnfilteredMutation { .. }
                | Self::BuilderState(_)
                | Self::UnsupportedQueryKind(_)
                | Self::Validation(_)
        )
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
