//! The fluent statement builder.
//!
//! A [`Query`] is created by a [`Schema`] factory method, accumulates filters,
//! SET entries, joins, grouping, ordering and pagination through chained
//! calls, and compiles itself once into SQL text plus positional values.
//!
//! ```
//! use dalsql::{Schema, Value};
//!
//! let mut schema = Schema::new("app");
//! schema.add_table("foo", ["id", "name", "fooId"])?;
//!
//! let mut q = schema.count("foo")?.filter("fooId", 123);
//! assert_eq!(
//!     q.to_sql()?,
//!     "SELECT COUNT(DISTINCT `f`.`id`) FROM `foo` `f` WHERE `f`.`fooId` = ?"
//! );
//! assert_eq!(q.values(), &[Value::from(123)]);
//! # Ok::<(), dalsql::DalError>(())
//! ```
//!
//! # Builder errors
//!
//! Chain methods cannot return `Result` without breaking the chain. The first
//! error a chain method hits (unknown join table, ON before JOIN, bad order
//! direction) is recorded and returned by [`Query::to_sql`] and every
//! execution method; later calls cannot clear it.
//!
//! # Compile once
//!
//! Compilation is memoized. Mutating a query after [`Query::to_sql`] does not
//! invalidate the cached text; it logs a warning on the `dalsql.query` target
//! and the stale SQL keeps being returned.

mod compile;
mod filter;
mod join;


pub use filter::{CompareOp, Conjunction, Filter, ValueField, parse_filter_name};
pub use join::{Join, JoinField, JoinTarget};

use crate::error::{DalError, DalResult};
use crate::executor::Executor;
use crate::row::{ExecResult, Row};
use crate::schema::{Schema, Table};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// The statement a [`Query`] compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Select,
    Insert,
    Update,
    Delete,
    Count,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Select => "select",
            QueryKind::Insert => "insert",
            QueryKind::Update => "update",
            QueryKind::Delete => "delete",
            QueryKind::Count => "count",
        }
    }

    /// SELECT and COUNT return rows; the rest report affected rows.
    pub fn returns_rows(self) -> bool {
        matches!(self, QueryKind::Select | QueryKind::Count)
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryKind {
    type Err = DalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "select" => Ok(QueryKind::Select),
            "insert" => Ok(QueryKind::Insert),
            "update" => Ok(QueryKind::Update),
            "delete" => Ok(QueryKind::Delete),
            "count" => Ok(QueryKind::Count),
            _ => Err(DalError::UnsupportedQueryKind(s.to_string())),
        }
    }
}

/// ORDER BY direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = DalError;

    /// Empty input means ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("asc") {
            Ok(Direction::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Direction::Desc)
        } else {
            Err(DalError::validation(format!("invalid order direction `{s}`")))
        }
    }
}

/// SQL text plus the values for its `?` placeholders, left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    sql: String,
    values: Vec<Value>,
}

impl CompiledQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.values)
    }
}

/// Single-use statement builder bound to one table of a [`Schema`].
///
/// Owned by whoever created it; it is plain data and never shared.
#[derive(Debug, Clone)]
pub struct Query<'s> {
    schema: &'s Schema,
    table: &'s Table,
    kind: QueryKind,
    filters: Vec<Filter>,
    set_fields: Vec<ValueField>,
    joins: Vec<Join<'s>>,
    /// Already-qualified expressions appended to the SELECT list
    extra_selects: Vec<String>,
    group_by: Option<String>,
    order_by: Option<(String, Direction)>,
    limit: i64,
    offset: i64,
    build_error: Option<DalError>,
    compiled: Option<CompiledQuery>,
}

impl<'s> Query<'s> {
    pub(crate) fn new(schema: &'s Schema, table: &'s Table, kind: QueryKind) -> Self {
        Self {
            schema,
            table,
            kind,
            filters: Vec::new(),
            set_fields: Vec::new(),
            joins: Vec::new(),
            extra_selects: Vec::new(),
            group_by: None,
            order_by: None,
            limit: 0,
            offset: 0,
            build_error: None,
            compiled: None,
        }
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn table(&self) -> &'s Table {
        self.table
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }

    /// The first error recorded by a chain method, if any.
    pub fn build_error(&self) -> Option<&DalError> {
        self.build_error.as_ref()
    }

    fn record_error(&mut self, err: DalError) {
        if self.build_error.is_none() {
            self.build_error = Some(err);
        }
    }

    fn note_mutation(&self, method: &'static str) {
        if self.compiled.is_some() {
            tracing::warn!(
                target: "dalsql.query",
                table = self.table.name(),
                method,
                "query mutated after compilation; cached SQL is stale"
            );
        }
    }

    // ==================== WHERE ====================

    /// Add a filter. `name` may start with `!`, `>`, `<`, `>=` or `<=` to pick
    /// the operator; plain names compare with `=`.
    pub fn filter(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.note_mutation("filter");
        self.filters.push(Filter::Condition(ValueField::new(name, value)));
        self
    }

    /// Force an explicit `AND` at this position.
    pub fn and(mut self) -> Self {
        self.note_mutation("and");
        self.filters.push(Filter::Conjunction(Conjunction::And));
        self
    }

    /// Force an explicit `OR` at this position.
    pub fn or(mut self) -> Self {
        self.note_mutation("or");
        self.filters.push(Filter::Conjunction(Conjunction::Or));
        self
    }

    // ==================== SET ====================

    /// Set a column value for INSERT/UPDATE.
    pub fn set(mut self, field_name: &str, value: impl Into<Value>) -> Self {
        self.note_mutation("set");
        self.set_fields.push(ValueField::new(field_name, value));
        self
    }

    // ==================== JOIN ====================

    /// Join a registered table; following `on_*` calls attach to it.
    pub fn join(mut self, table_name: &str) -> Self {
        self.note_mutation("join");
        match self.schema.table(table_name) {
            Ok(table) => self.joins.push(Join::new(table)),
            Err(err) => self.record_error(err),
        }
        self
    }

    /// Add `joined.field <op> ?` to the most recent join.
    pub fn on_value(self, field_name: &str, value: impl Into<Value>) -> Self {
        self.push_on(field_name, JoinTarget::Value(value.into()), "on_value")
    }

    /// Add `joined.field <op> other_table.other_field` to the most recent join.
    pub fn on_field(self, field_name: &str, join_table: &str, join_field: &str) -> Self {
        let target = JoinTarget::Field {
            table: join_table.to_string(),
            field: join_field.to_string(),
        };
        self.push_on(field_name, target, "on_field")
    }

    fn push_on(mut self, field_name: &str, target: JoinTarget, method: &'static str) -> Self {
        self.note_mutation(method);
        if let JoinTarget::Field { table, .. } = &target {
            if let Err(err) = self.schema.table(table) {
                self.record_error(err);
                return self;
            }
        }
        match self.joins.last_mut() {
            Some(join) => join.push(JoinField {
                field_name: field_name.to_string(),
                target,
            }),
            None => self.record_error(DalError::builder_state(format!(
                "cannot call `{method}` before any joins have been created"
            ))),
        }
        self
    }

    /// Append `` `<alias of join_table>`.`<join_field>` as `<alias>` `` to the SELECT list.
    pub fn select_join_field(mut self, join_table: &str, join_field: &str, alias: &str) -> Self {
        self.note_mutation("select_join_field");
        match self.schema.table(join_table) {
            Ok(table) => self.extra_selects.push(format!(
                "`{}`.`{}` as `{}`",
                table.alias(),
                join_field,
                alias
            )),
            Err(err) => self.record_error(err),
        }
        self
    }

    // ==================== Grouping, ordering, pagination ====================

    /// Set a raw GROUP BY expression. Not parameter-bound: never pass untrusted input.
    pub fn group_by(mut self, clause: &str) -> Self {
        self.note_mutation("group_by");
        self.group_by = Some(clause.to_string());
        self
    }

    /// Set ORDER BY. `direction` is `asc`, `desc` or empty (ascending).
    ///
    /// `field` is inlined as raw text: never pass untrusted input.
    pub fn order(mut self, field: &str, direction: &str) -> Self {
        self.note_mutation("order");
        match direction.parse::<Direction>() {
            Ok(dir) => self.order_by = Some((field.to_string(), dir)),
            Err(err) => self.record_error(err),
        }
        self
    }

    /// ORDER BY field ASC.
    pub fn order_asc(mut self, field: &str) -> Self {
        self.note_mutation("order_asc");
        self.order_by = Some((field.to_string(), Direction::Asc));
        self
    }

    /// ORDER BY field DESC.
    pub fn order_desc(mut self, field: &str) -> Self {
        self.note_mutation("order_desc");
        self.order_by = Some((field.to_string(), Direction::Desc));
        self
    }

    /// Set LIMIT. Values <= 0 emit nothing.
    pub fn limit(mut self, n: i64) -> Self {
        self.note_mutation("limit");
        self.limit = n;
        self
    }

    /// Set OFFSET. Values <= 0 emit nothing.
    pub fn offset(mut self, n: i64) -> Self {
        self.note_mutation("offset");
        self.offset = n;
        self
    }

    // ==================== Compilation ====================

    /// Compile (once) and return the SQL text with its values.
    pub fn build(&mut self) -> DalResult<&CompiledQuery> {
        let compiled = match self.compiled.take() {
            Some(compiled) => compiled,
            None => {
                if let Some(err) = &self.build_error {
                    return Err(err.clone());
                }
                let compiled = self.compile()?;
                tracing::trace!(
                    target: "dalsql.query",
                    kind = %self.kind,
                    table = self.table.name(),
                    params = compiled.values.len(),
                    sql = %compiled.sql,
                    "compiled query"
                );
                compiled
            }
        };
        Ok(self.compiled.insert(compiled))
    }

    /// Compile (once) and return the SQL text.
    pub fn to_sql(&mut self) -> DalResult<&str> {
        Ok(self.build()?.sql())
    }

    /// Bound values in placeholder order. Empty until the query is compiled.
    pub fn values(&self) -> &[Value] {
        self.compiled
            .as_ref()
            .map(CompiledQuery::values)
            .unwrap_or_default()
    }

    // ==================== Execution ====================

    /// Compile and run a SELECT/COUNT, returning its rows.
    pub async fn fetch(&mut self, conn: &impl Executor) -> DalResult<Vec<Row>> {
        if !self.kind.returns_rows() {
            return Err(DalError::builder_state(format!(
                "{} does not return rows; use `exec`",
                self.kind
            )));
        }
        let compiled = self.build()?;
        conn.query(compiled.sql(), compiled.values()).await
    }

    /// Compile and run a COUNT, returning the counted value.
    pub async fn count_rows(&mut self, conn: &impl Executor) -> DalResult<i64> {
        if self.kind != QueryKind::Count {
            return Err(DalError::builder_state(format!(
                "`count_rows` needs a count query, got {}",
                self.kind
            )));
        }
        let compiled = self.build()?;
        let row = conn.query_one(compiled.sql(), compiled.values()).await?;
        row.get_idx(0)
            .and_then(Value::as_i64)
            .ok_or_else(|| DalError::Other("COUNT returned a non-integer value".to_string()))
    }

    /// Compile and run an INSERT/UPDATE/DELETE.
    pub async fn exec(&mut self, conn: &impl Executor) -> DalResult<ExecResult> {
        if self.kind.returns_rows() {
            return Err(DalError::builder_state(format!(
                "{} returns rows; use `fetch`",
                self.kind
            )));
        }
        let compiled = self.build()?;
        conn.execute(compiled.sql(), compiled.values()).await
    }
}
