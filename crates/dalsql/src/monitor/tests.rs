use super::*;
use crate::error::{DalError, DalResult};
use crate::executor::Executor;
use crate::row::{ExecResult, Row};
use crate::value::Value;
use std::sync::Arc;
use std::time::Duration;

struct SleepyExecutor {
    delay: Duration,
}

impl Executor for SleepyExecutor {
    async fn query(&self, _: &str, _: &[Value]) -> DalResult<Vec<Row>> {
        tokio::time::sleep(self.delay).await;
        let columns: Arc<[String]> = vec!["n".to_string()].into();
        Ok(vec![Row::new(columns, vec![Value::from(1i64)])])
    }

    async fn execute(&self, _: &str, params: &[Value]) -> DalResult<ExecResult> {
        tokio::time::sleep(self.delay).await;
        Ok(ExecResult::new(params.len() as u64))
    }
}

#[test]
fn truncate_respects_char_boundaries() {
    assert_eq!(truncate_sql_bytes("SELECT 1", 100), "SELECT 1");
    assert_eq!(truncate_sql_bytes("SELECT 1", 6), "SELECT");
    // 'é' is two bytes; cutting inside it backs off to the boundary
    assert_eq!(truncate_sql_bytes("café", 4), "caf");
}

#[test]
fn config_defaults() {
    let config = MonitorConfig::new();
    assert!(config.query_timeout.is_none());
    assert!(config.slow_query_threshold.is_none());
    assert_eq!(config.max_sql_length, Some(200));
    assert!(config.no_truncate().max_sql_length.is_none());
}

#[tokio::test]
async fn passes_through_without_timeout() {
    let conn = InstrumentedExecutor::new(SleepyExecutor {
        delay: Duration::from_millis(1),
    })
    .with_config(MonitorConfig::new().with_slow_query_threshold(Duration::from_secs(5)));

    let rows = conn.query("SELECT 1", &[]).await.unwrap();
    assert_eq!(rows.len(), 1);

    let result = conn
        .execute("DELETE FROM `t` USING `t` AS `t` WHERE `t`.`id` = ?", &[Value::from(1)])
        .await
        .unwrap();
    assert_eq!(result.rows_affected, 1);
}

#[tokio::test]
async fn timeout_maps_to_timeout_error() {
    let timeout = Duration::from_millis(10);
    let conn = InstrumentedExecutor::new(SleepyExecutor {
        delay: Duration::from_secs(2),
    })
    .with_config(MonitorConfig::new().with_query_timeout(timeout));

    let err = conn.query("SELECT 1", &[]).await.unwrap_err();
    assert_eq!(err, DalError::Timeout(timeout));
    assert!(err.is_timeout());
    assert!(!err.is_build_error());
}
