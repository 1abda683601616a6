//! Prometheus metrics for a load run.
//!
//! Every task attempt is recorded through the `metrics` facade. Without an
//! installed recorder the calls are no-ops, so the exporter is optional.
//!
//! | Metric | Kind | Labels |
//! |--------|------|--------|
//! | `load_task_requests_total` | counter | `task` |
//! | `load_task_failures_total` | counter | `task` |
//! | `load_task_duration_seconds` | histogram | `task` |

use crate::error::LoadError;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Duration;

/// Latency buckets in seconds, shared by every task histogram
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Install the Prometheus exporter and serve it at `http://{addr}/metrics`.
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns `LoadError::Metrics` if the exporter cannot be built or a
/// recorder is already installed.
pub fn install_exporter(addr: SocketAddr) -> Result<(), LoadError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            DURATION_BUCKETS,
        )
        .map_err(|e| LoadError::Metrics(e.to_string()))?
        .with_http_listener(addr)
        .install()
        .map_err(|e| LoadError::Metrics(e.to_string()))?;

    register_metrics();
    tracing::info!(%addr, "Metrics available at http://{addr}/metrics");
    Ok(())
}

/// Register metric descriptions with the installed recorder.
fn register_metrics() {
    describe_counter!(
        "load_task_requests_total",
        "Total number of task requests issued by simulated users"
    );
    describe_counter!(
        "load_task_failures_total",
        "Total number of task requests that failed"
    );
    describe_histogram!(
        "load_task_duration_seconds",
        "Time taken by one task request, refresh included"
    );
}

/// Record one task attempt.
pub fn record_task(task: &'static str, success: bool, elapsed: Duration) {
    counter!("load_task_requests_total", "task" => task).increment(1);
    if !success {
        counter!("load_task_failures_total", "task" => task).increment(1);
    }
    histogram!("load_task_duration_seconds", "task" => task).record(elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_recorder_is_noop() {
        record_task("get_user", true, Duration::from_millis(3));
        record_task("get_user", false, Duration::from_millis(9));
    }
}
