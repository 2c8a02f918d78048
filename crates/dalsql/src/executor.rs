//! The executor seam: whatever actually talks to the database.

use crate::error::{DalError, DalResult};
use crate::row::{ExecResult, Row};
use crate::value::Value;

/// Runs finished SQL text with positional `?` parameters.
///
/// dalsql never opens a connection itself. Implement this for a driver
/// connection, a pool handle, or a transaction; statement builders and
/// [`Schema`](crate::Schema) accept any `&impl Executor`.
pub trait Executor: Send + Sync {
    /// Execute a statement that returns rows (SELECT / COUNT).
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = DalResult<Vec<Row>>> + Send;

    /// Execute a statement and return the affected-rows / insert-id result.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = DalResult<ExecResult>> + Send;

    /// Execute a query and return the **first** row.
    ///
    /// Returns [`DalError::NotFound`] if no rows are returned. Extra rows are ignored.
    fn query_one(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = DalResult<Row>> + Send {
        async move {
            self.query(sql, params)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| DalError::not_found("Expected 1 row, got 0"))
        }
    }
}
