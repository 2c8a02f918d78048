//! # dalsql
//!
//! A schema-aware SQL statement builder. Declare tables and their columns
//! once, then build SELECT/INSERT/UPDATE/DELETE/COUNT statements through a
//! fluent API and get back SQL text plus positional values ready for a driver.
//!
//! ## Features
//!
//! - **Short aliases**: every registered table gets a unique alias (`foo` → `f`,
//!   `foe` → `f1`) used to qualify every column
//! - **Placeholders only**: values are always bound through `?`, in the same
//!   order the placeholders appear (JOIN values first, then WHERE values)
//! - **Operator prefixes**: `filter("!id", 1)`, `filter(">=age", 18)`
//! - **Safe defaults**: UPDATE requires SET, UPDATE/DELETE require WHERE
//! - **Bring your own driver**: anything implementing [`Executor`] runs the
//!   result; [`monitor::InstrumentedExecutor`] adds logging and timeouts
//!
//! ## Example
//!
//! ```
//! use dalsql::{Schema, Value};
//!
//! let mut schema = Schema::new("app");
//! schema.add_table("foo", ["id", "name", "fooId"])?;
//! schema.add_table("foe", ["id", "name", "fooId"])?;
//!
//! let mut q = schema
//!     .select("foe")?
//!     .join("foo")
//!     .on_field("fooId", "foe", "id")
//!     .filter("name", "foo")
//!     .filter("!fooId", 123);
//!
//! assert_eq!(
//!     q.to_sql()?,
//!     "SELECT `f1`.`id`, `f1`.`name`, `f1`.`fooId` FROM `foe` `f1` \
//!      JOIN `foo` `f` ON `f`.`fooId` = `f1`.`id` \
//!      WHERE `f1`.`name` = ? AND `f1`.`fooId` != ?"
//! );
//! assert_eq!(q.values(), &[Value::from("foo"), Value::from(123)]);
//! # Ok::<(), dalsql::DalError>(())
//! ```

pub mod dal;
pub mod error;
pub mod executor;
pub mod monitor;
pub mod prelude;
pub mod query;
pub mod row;
pub mod schema;
pub mod value;

pub use dal::Dal;
pub use error::{DalError, DalResult};
pub use executor::Executor;
pub use monitor::{InstrumentedExecutor, MonitorConfig};
pub use query::{
    CompareOp, CompiledQuery, Conjunction, Direction, Filter, Join, JoinField, JoinTarget, Query,
    QueryKind, ValueField, parse_filter_name,
};
pub use row::{ExecResult, Row};
pub use schema::{Field, Schema, SchemaConfig, Table};
pub use value::Value;
