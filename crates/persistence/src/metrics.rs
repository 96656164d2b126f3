//! Database metrics collection.
//!
//! Records query durations and outcomes, plus connection pool gauges.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record database query duration.
pub fn record_query_duration(query_name: &'static str, duration_secs: f64) {
    histogram!("database_query_duration_seconds", "query" => query_name).record(duration_secs);
}

/// Record database connection pool metrics.
///
/// Called from the health endpoint so every probe refreshes the gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Times a database operation and records its duration and outcome.
///
/// Usage:
/// ```ignore
/// let timer = QueryTimer::new("find_gadget_by_id");
/// let result = sqlx::query_as::<_, GadgetEntity>(...).fetch_optional(&pool).await;
/// timer.finish(&result);
/// result
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    /// Start a timer for the given query name.
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration and whether the query succeeded.
    pub fn finish<T, E>(self, result: &Result<T, E>) {
        let outcome = if result.is_ok() { "ok" } else { "error" };
        counter!(
            "database_queries_total",
            "query" => self.query_name,
            "outcome" => outcome
        )
        .increment(1);
        record_query_duration(self.query_name, self.start.elapsed().as_secs_f64());
    }
}
