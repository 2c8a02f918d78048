//! Statement logging and timeouts around an [`Executor`](crate::Executor).
//!
//! # Example
//!
//! ```rust,ignore
//! use dalsql::monitor::{InstrumentedExecutor, MonitorConfig};
//! use std::time::Duration;
//!
//! let conn = InstrumentedExecutor::new(driver_conn).with_config(
//!     MonitorConfig::new()
//!         .with_query_timeout(Duration::from_secs(30))
//!         .with_slow_query_threshold(Duration::from_millis(500)),
//! );
//!
//! let rows = schema.select("users")?.filter("id", 1).fetch(&conn).await?;
//! ```

mod config;
mod instrumented;

#[cfg(test)]
mod tests;

pub use config::MonitorConfig;
pub use instrumented::InstrumentedExecutor;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
