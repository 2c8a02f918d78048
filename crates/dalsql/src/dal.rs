//! Executor + schema bundle.

use crate::error::DalResult;
use crate::executor::Executor;
use crate::row::{ExecResult, Row};
use crate::schema::Schema;
use crate::value::Value;

/// Holds the executor and the schema describing the database behind it.
///
/// Build one at start-up and pass it where it is needed; there is no global
/// instance. Register tables through [`Dal::schema_mut`] before sharing it.
#[derive(Debug)]
pub struct Dal<E> {
    conn: E,
    schema: Schema,
}

impl<E: Executor> Dal<E> {
    pub fn new(conn: E, schema: Schema) -> Self {
        Self { conn, schema }
    }

    pub fn connection(&self) -> &E {
        &self.conn
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn schema_mut(&mut self) -> &mut Schema {
        &mut self.schema
    }

    /// Run raw SQL that does not return rows.
    pub async fn exec(&self, sql: &str, args: &[Value]) -> DalResult<ExecResult> {
        self.schema.exec(&self.conn, sql, args).await
    }

    /// Run raw SQL that returns rows.
    pub async fn query(&self, sql: &str, args: &[Value]) -> DalResult<Vec<Row>> {
        self.schema.query(&self.conn, sql, args).await
    }
}
