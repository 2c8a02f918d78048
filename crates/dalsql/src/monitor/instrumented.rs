use super::config::MonitorConfig;
use super::truncate_sql_bytes;
use crate::error::{DalError, DalResult};
use crate::executor::Executor;
use crate::row::{ExecResult, Row};
use crate::value::Value;
use std::time::{Duration, Instant};

/// Wraps an [`Executor`] with `tracing` output, slow-statement warnings and timeouts.
///
/// Statements are logged on the `dalsql.sql` target before they run. Bound
/// values are never logged, only their count.
#[derive(Debug, Clone)]
pub struct InstrumentedExecutor<E> {
    inner: E,
    config: MonitorConfig,
}

impl<E: Executor> InstrumentedExecutor<E> {
    /// Wrap `inner` with the default configuration.
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            config: MonitorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    fn display_sql(&self, sql: &str) -> String {
        match self.config.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    async fn with_timeout<T, F>(&self, future: F) -> DalResult<T>
    where
        F: std::future::Future<Output = DalResult<T>> + Send,
    {
        match self.config.query_timeout {
            Some(timeout) => tokio::time::timeout(timeout, future)
                .await
                .unwrap_or(Err(DalError::Timeout(timeout))),
            None => future.await,
        }
    }

    fn report<T>(&self, sql: &str, duration: Duration, result: &DalResult<T>) {
        if let Err(err) = result {
            tracing::warn!(
                target: "dalsql.sql",
                sql = %self.display_sql(sql),
                duration_ms = duration.as_millis() as u64,
                error = %err,
                "statement failed"
            );
            return;
        }
        if let Some(threshold) = self.config.slow_query_threshold {
            if duration > threshold {
                tracing::warn!(
                    target: "dalsql.sql",
                    sql = %self.display_sql(sql),
                    duration_ms = duration.as_millis() as u64,
                    threshold_ms = threshold.as_millis() as u64,
                    "slow statement"
                );
            }
        }
    }
}

impl<E: Executor> Executor for InstrumentedExecutor<E> {
    async fn query(&self, sql: &str, params: &[Value]) -> DalResult<Vec<Row>> {
        tracing::debug!(
            target: "dalsql.sql",
            sql = %self.display_sql(sql),
            params = params.len(),
            "query"
        );
        let start = Instant::now();
        let result = self.with_timeout(self.inner.query(sql, params)).await;
        self.report(sql, start.elapsed(), &result);
        result
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> DalResult<ExecResult> {
        tracing::debug!(
            target: "dalsql.sql",
            sql = %self.display_sql(sql),
            params = params.len(),
            "execute"
        );
        let start = Instant::now();
        let result = self.with_timeout(self.inner.execute(sql, params)).await;
        self.report(sql, start.elapsed(), &result);
        result
    }
}
