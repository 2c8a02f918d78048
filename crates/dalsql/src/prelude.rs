//! Convenient imports for typical `dalsql` usage.
//!
//! ```ignore
//! use dalsql::prelude::*;
//! ```

pub use crate::{Dal, DalError, DalResult, ExecResult, Executor, Query, Row, Schema, Value};
