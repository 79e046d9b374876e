use std::sync::OnceLock;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload. Safe to call more than once; the
/// recorder is installed on the first call only.
pub fn init_metrics() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if metrics::set_global_recorder(recorder).is_err() {
                tracing::warn!("Metrics recorder already installed");
            }

            // Pre-register counters so they appear even before the first increment.
            for operation in ["user_stats", "wallet_rewards"] {
                counter!("aggregation_runs_total", "operation" => operation).absolute(0);
                counter!("aggregation_failures_total", "operation" => operation).absolute(0);
                // Histogram is lazily created on first record; force creation.
                histogram!("aggregation_latency_seconds", "operation" => operation).record(0.0);
            }
            counter!("rewards_live_refreshes_total").absolute(0);

            handle
        })
        .clone()
}
